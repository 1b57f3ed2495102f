//! Builds a small schedule graph, commits an assignment, and shows what the
//! builders reject.
//!
//! Run with `RUST_LOG=debug` to see every edge the graph accepts.

use chrono::NaiveDate;
use schedule_hypergraph::domain::{Activity, Skill, Technician, WorkOrder};
use schedule_hypergraph::{
    AssignmentBuilder, ExcludeBuilder, ExternalKey, GraphError, SharedScheduleGraph,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).expect("valid date")
}

fn technician(id: u64, skill: Skill) -> Result<Technician, Box<dyn std::error::Error>> {
    let start = date(13).and_hms_opt(7, 0, 0).expect("valid time");
    let end = date(17).and_hms_opt(17, 0, 0).expect("valid time");
    Ok(Technician::builder(id)
        .add_skill(skill)
        .add_availability(start, end)?
        .build()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let graph = SharedScheduleGraph::default();
    let (period, activity, work_order, technicians) = {
        let mut g = graph.write();
        let period = g.ingest_periods(&[date(13), date(27)])?[0];
        let record = WorkOrder::new(
            1000000001,
            date(13),
            vec![
                Activity::new(10, 2, Skill::MtnMech),
                Activity::new(20, 1, Skill::MtnElec),
            ],
        )?;
        let ingested = g.ingest_work_order(&record)?;
        let technicians = [
            g.ingest_technician(&technician(1, Skill::MtnMech)?)?,
            g.ingest_technician(&technician(2, Skill::MtnMech)?)?,
            g.ingest_technician(&technician(3, Skill::MtnElec)?)?,
        ];
        (period, ingested.activities[0], ingested.work_order, technicians)
    };

    let day = |d: u32| {
        graph
            .read()
            .resolve(&ExternalKey::Day(date(d)))
            .ok_or("day not ingested")
    };

    let id = graph.commit(
        &AssignmentBuilder::new(activity, period)
            .technicians([technicians[0], technicians[1]])
            .days([day(13)?, day(14)?]),
    )?;
    info!(edge = %id, "assignment committed");

    let rejected = graph.commit(
        &AssignmentBuilder::new(activity, period)
            .technicians([technicians[0], technicians[2]])
            .day(day(15)?),
    );
    if let Err(GraphError::Validation(reason)) = &rejected {
        info!(%reason, "assignment rejected");
    }

    let later = graph
        .read()
        .periods()
        .nth(1)
        .map(|(_, id)| id)
        .ok_or("second period missing")?;
    graph.commit(&ExcludeBuilder::new(work_order).period(later))?;

    let g = graph.read();
    info!(
        nodes = g.node_count(),
        edges = g.edge_count(),
        capacity_hours = g.technician_capacity(technicians[0], period)?.value(),
        order = ?g.activity_order(work_order)?,
        "graph built"
    );
    Ok(())
}
