//! Test suite for the graph container, its queries and ingestion.

use chrono::NaiveDate;

use super::*;
use crate::builders::fixtures::{at, date, technician, Scenario, WORK_ORDER};
use crate::builders::{
    ActivityRelationBuilder, AssignmentBuilder, EdgeBuilder, ExcludeBuilder, GraphView,
    PeriodDayBuilder, ValidationError,
};
use crate::domain::{Activity, Period, RelationKind, Skill, Technician, WorkOrder};
use crate::edges::{EdgeKind, Role};
use crate::nodes::{ActivityNode, NodeKind, WorkOrderNode};

fn team_assignment(s: &Scenario, days: &[u32]) -> AssignmentBuilder {
    let [t1, t2, _] = s.technicians;
    AssignmentBuilder::new(s.activity, s.period)
        .technicians([t1, t2])
        .days(days.iter().map(|&d| s.day(d)))
}

#[cfg(test)]
mod scenario {
    use super::*;

    #[test]
    fn skilled_pair_is_committed_and_indexed() {
        let mut s = Scenario::new();
        let [t1, t2, _] = s.technicians;
        let id = s.graph.add(&team_assignment(&s, &[13, 14])).unwrap();

        for node in [s.activity, t1, t2, s.period, s.day(13), s.day(14)] {
            assert!(s.graph.edges_touching(node).any(|e| e == id));
        }
        assert_eq!(s.graph.incidence().roles_of(t1, id), &[Role::Technician]);
        assert_eq!(s.graph.assignments_for_technician(t1).count(), 1);
        assert!(s.graph.check_consistency());
    }

    #[test]
    fn unskilled_technician_leaves_graph_untouched() {
        let mut s = Scenario::new();
        let [t1, _, t3] = s.technicians;
        let touching_before: Vec<_> = s.graph.edges_touching(t3).collect();
        let revision = s.graph.revision();

        let result = s.graph.add(
            &AssignmentBuilder::new(s.activity, s.period)
                .technicians([t1, t3])
                .days([s.day(13), s.day(14)]),
        );

        assert_eq!(
            result,
            Err(GraphError::Validation(ValidationError::SkillMismatch {
                technician: t3,
                required: Skill::MtnMech
            }))
        );
        assert_eq!(s.graph.edges_touching(t3).collect::<Vec<_>>(), touching_before);
        assert_eq!(s.graph.revision(), revision);
    }

    #[test]
    fn availability_gap_is_atomic() {
        let mut s = Scenario::new();
        let nodes = s.graph.node_count();
        let edges = s.graph.edge_count();
        let incidence = s.graph.incidence().clone();
        let revision = s.graph.revision();

        let result = s.graph.add(&team_assignment(&s, &[16, 17, 18]));

        assert!(matches!(
            result,
            Err(GraphError::Validation(ValidationError::AvailabilityGap { day, .. })) if day == date(18)
        ));
        assert_eq!(s.graph.node_count(), nodes);
        assert_eq!(s.graph.edge_count(), edges);
        assert_eq!(s.graph.incidence(), &incidence);
        assert_eq!(s.graph.revision(), revision);
    }
}

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn retire_round_trips_the_index() {
        let mut s = Scenario::new();
        let before = s.graph.incidence().clone();

        let id = s.graph.add(&team_assignment(&s, &[13])).unwrap();
        let retired = s.graph.retire(id).unwrap();

        assert_eq!(retired.kind(), EdgeKind::Assignment);
        assert_eq!(s.graph.incidence(), &before);
        assert!(s.graph.edge(id).is_none());
        assert_eq!(s.graph.retire(id), Err(GraphError::EdgeNotFound(id)));
    }

    #[test]
    fn retired_id_stays_dead_after_slot_reuse() {
        let mut s = Scenario::new();
        let first = s.graph.add(&team_assignment(&s, &[13])).unwrap();
        s.graph.retire(first).unwrap();
        let second = s.graph.add(&team_assignment(&s, &[14])).unwrap();

        assert_eq!(first.slot(), second.slot());
        assert!(s.graph.edge(first).is_none());
        assert!(s.graph.contains_edge(second));
    }

    #[test]
    fn replace_swaps_edges_in_one_step() {
        let mut s = Scenario::new();
        let old = s.graph.add(&team_assignment(&s, &[13])).unwrap();
        let revision = s.graph.revision();

        let new = s.graph.replace(old, &team_assignment(&s, &[14, 15])).unwrap();

        assert!(s.graph.edge(old).is_none());
        let days = s.graph.edge(new).unwrap().nodes_in_role(Role::Day).to_vec();
        assert_eq!(days, vec![s.day(14), s.day(15)]);
        assert!(s.graph.revision() > revision);
        assert!(s.graph.check_consistency());
    }

    #[test]
    fn failed_replace_keeps_old_edge() {
        let mut s = Scenario::new();
        let old = s.graph.add(&team_assignment(&s, &[13])).unwrap();

        let result = s.graph.replace(old, &team_assignment(&s, &[25]));

        assert!(matches!(
            result,
            Err(GraphError::Validation(ValidationError::AvailabilityGap { .. }))
        ));
        assert!(s.graph.contains_edge(old));
    }

    #[test]
    fn replace_may_reuse_exclusive_members() {
        let mut s = Scenario::new();
        let (old, _) = s.graph.period_day_edge(s.period).unwrap();
        let days: Vec<_> = s.graph.period_days(s.period).unwrap().to_vec();

        let new = s
            .graph
            .replace(old, &PeriodDayBuilder::new(s.period).days(days))
            .unwrap();
        assert_ne!(old, new);
        assert_eq!(s.graph.period_of_day(s.day(20)), Some(s.period));
    }

    #[test]
    fn referenced_node_cannot_be_removed() {
        let mut s = Scenario::new();
        let [t1, _, _] = s.technicians;
        let id = s.graph.add(&team_assignment(&s, &[13])).unwrap();

        assert_eq!(
            s.graph.remove_node(t1),
            Err(GraphError::NodeStillReferenced { node: t1, edges: 1 })
        );

        s.graph.retire(id).unwrap();
        let removed = s.graph.remove_node(t1).unwrap();
        assert_eq!(removed.as_technician().map(|t| t.id()), Some(1));
        assert!(matches!(
            s.graph.lookup(t1),
            Err(RegistryError::NodeNotFound(id)) if id == t1
        ));
    }

    #[test]
    fn edge_built_before_a_mutation_is_stale() {
        let mut s = Scenario::new();
        let validated = team_assignment(&s, &[13]).build(&s.graph).unwrap();
        s.graph.register(Node::Day(date(31))).unwrap();

        assert!(matches!(
            s.graph.insert(validated),
            Err(GraphError::StaleEdge { .. })
        ));
        assert_eq!(s.graph.assignments_for_activity(s.activity).count(), 0);
    }

    #[test]
    fn edge_built_against_another_graph_is_foreign() {
        let mut s = Scenario::new();
        let other = Scenario::new();
        let validated = team_assignment(&other, &[13]).build(&other.graph).unwrap();

        assert_eq!(
            s.graph.insert(validated),
            Err(GraphError::ForeignEdge {
                expected: s.graph.id(),
                found: other.graph.id()
            })
        );
    }

    #[test]
    fn clone_is_a_separate_graph() {
        let mut s = Scenario::new();
        let mut copy = s.graph.clone();
        assert_ne!(copy.id(), s.graph.id());

        // Same revision, different contents.
        s.graph.register(Node::Day(date(31))).unwrap();
        let work_order = copy
            .register(Node::WorkOrder(WorkOrderNode::new(2000000000, date(13))))
            .unwrap();
        assert_eq!(copy.revision(), s.graph.revision());

        let validated = ExcludeBuilder::new(work_order)
            .period(s.period)
            .build(&copy)
            .unwrap();
        assert_eq!(
            s.graph.insert(validated),
            Err(GraphError::ForeignEdge {
                expected: s.graph.id(),
                found: copy.id()
            })
        );
        assert!(s.graph.lookup(work_order).is_err());
        assert_eq!(s.graph.edges(EdgeKind::Exclude).count(), 0);
        assert!(s.graph.check_consistency());
    }

    #[test]
    fn validated_replacement_retires_old_edge_on_insert() {
        let mut s = Scenario::new();
        let old = s.graph.add(&team_assignment(&s, &[13])).unwrap();

        let validated = s
            .graph
            .validate_replacement(old, &team_assignment(&s, &[14]))
            .unwrap();
        assert_eq!(validated.replaces(), Some(old));
        assert!(s.graph.contains_edge(old));

        let new = s.graph.insert(validated).unwrap();
        assert!(!s.graph.contains_edge(old));
        let live: Vec<_> = s
            .graph
            .assignments_for_activity(s.activity)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(live, vec![new]);
        assert!(s.graph.check_consistency());
    }

    #[test]
    fn replacement_validated_before_a_mutation_is_stale() {
        let mut s = Scenario::new();
        let old = s.graph.add(&team_assignment(&s, &[13])).unwrap();
        let validated = s
            .graph
            .validate_replacement(old, &team_assignment(&s, &[14]))
            .unwrap();
        s.graph.retire(old).unwrap();

        assert!(matches!(
            s.graph.insert(validated),
            Err(GraphError::StaleEdge { .. })
        ));
        assert_eq!(s.graph.assignments_for_activity(s.activity).count(), 0);
        assert_eq!(
            s.graph.validate_replacement(old, &team_assignment(&s, &[14])),
            Err(GraphError::EdgeNotFound(old))
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GraphConfig::default().with_period_length_days(0);
        assert!(matches!(
            ScheduleGraph::with_config(config),
            Err(GraphError::Config(_))
        ));
    }
}

#[cfg(test)]
mod queries {
    use super::*;

    #[test]
    fn assignments_by_every_member() {
        let mut s = Scenario::new();
        let [t1, t2, t3] = s.technicians;
        let id = s.graph.add(&team_assignment(&s, &[13, 14])).unwrap();

        let by_technician: Vec<_> = s.graph.assignments_for_technician(t2).collect();
        assert_eq!(by_technician.len(), 1);
        assert_eq!(by_technician[0].0, id);
        assert_eq!(by_technician[0].1.activity(), s.activity);
        assert_eq!(s.graph.assignments_for_technician(t3).count(), 0);

        let by_activity: Vec<_> = s
            .graph
            .assignments_for_activity(s.activity)
            .map(|(e, _)| e)
            .collect();
        assert_eq!(by_activity, vec![id]);
        let by_period: Vec<_> = s
            .graph
            .assignments_for_period(s.period)
            .map(|(e, _)| e)
            .collect();
        assert_eq!(by_period, vec![id]);
        assert_eq!(s.graph.edges(EdgeKind::Assignment).count(), 1);
        assert_eq!(s.graph.edges_of_kind(t1, EdgeKind::Assignment).count(), 1);
        assert_eq!(s.graph.edges_of_kind(t1, EdgeKind::Exclude).count(), 0);
    }

    #[test]
    fn period_decomposition_lookups() {
        let s = Scenario::new();
        let days = s.graph.period_days(s.period).unwrap();

        assert_eq!(days.len(), 14);
        assert_eq!(days[0], s.day(13));
        assert_eq!(s.graph.period_of_day(s.day(26)), Some(s.period));
        assert_eq!(s.graph.period_of_day(s.period), None);
    }

    #[test]
    fn composition_lookups() {
        let s = Scenario::new();
        assert_eq!(s.graph.activities_of(s.work_order), Some(&[s.activity][..]));
        assert_eq!(s.graph.work_order_of(s.activity), Some(s.work_order));
        assert_eq!(s.graph.activities_of(s.activity), None);
    }

    #[test]
    fn excluded_periods_are_unioned() {
        let mut s = Scenario::new();
        let later = s.graph.ingest_periods(&[date(27)]).unwrap()[0];
        s.graph
            .add(&ExcludeBuilder::new(s.work_order).period(s.period))
            .unwrap();
        s.graph
            .add(&ExcludeBuilder::new(s.work_order).periods([later]))
            .unwrap();

        let excluded = s.graph.excluded_periods(s.work_order);
        assert_eq!(excluded.len(), 2);
        assert!(excluded.contains(&s.period) && excluded.contains(&later));
    }

    #[test]
    fn periods_come_back_in_start_order() {
        let mut s = Scenario::new();
        s.graph.ingest_periods(&[date(27)]).unwrap();
        let starts: Vec<_> = s.graph.periods().map(|(p, _)| p.start_date()).collect();
        assert_eq!(starts, vec![date(13), date(27)]);
    }

    #[test]
    fn capacity_counts_availability_inside_the_window() {
        let mut s = Scenario::new();
        let [t1, _, _] = s.technicians;
        let hours = s.graph.technician_capacity(t1, s.period).unwrap();
        // 13th 07:00 to 17th 17:00
        assert!((hours.value() - 106.0).abs() < 1e-9);

        let later = s.graph.ingest_periods(&[date(27)]).unwrap()[0];
        let none = s.graph.technician_capacity(t1, later).unwrap();
        assert_eq!(none.value(), 0.0);

        assert!(matches!(
            s.graph.technician_capacity(s.period, s.period),
            Err(GraphError::KindMismatch {
                expected: NodeKind::Technician,
                ..
            })
        ));
    }

    #[test]
    fn capacity_clips_to_the_window() {
        let mut graph = ScheduleGraph::with_config(
            GraphConfig::default().with_period_length_days(2),
        )
        .unwrap();
        let period = graph.ingest_periods(&[date(13)]).unwrap()[0];
        let tech = graph
            .ingest_technician(&technician(9, Skill::MtnElec))
            .unwrap();
        // 13th 07:00 to 15th 00:00
        let hours = graph.technician_capacity(tech, period).unwrap();
        assert!((hours.value() - 41.0).abs() < 1e-9);
    }

    #[test]
    fn activity_order_follows_relations() {
        let mut graph = ScheduleGraph::new();
        let record = WorkOrder::new(
            WORK_ORDER,
            date(13),
            vec![
                Activity::new(10, 1, Skill::MtnMech),
                Activity::new(20, 1, Skill::MtnElec),
                Activity::new(30, 1, Skill::MtnMech),
            ],
        )
        .unwrap();
        let ingested = graph.ingest_work_order(&record).unwrap();

        assert_eq!(
            graph.activity_order(ingested.work_order).unwrap(),
            ingested.activities
        );

        let (first, last) = (ingested.activities[0], ingested.activities[2]);
        graph
            .add(&ActivityRelationBuilder::new(last, first).relation(RelationKind::StartStart))
            .unwrap();
        assert_eq!(
            graph.activity_order(ingested.work_order),
            Err(GraphError::RelationCycle {
                work_order: ingested.work_order
            })
        );
    }
}

#[cfg(test)]
mod ingestion {
    use super::*;

    fn record(activities: Vec<Activity>) -> WorkOrder {
        WorkOrder::new(WORK_ORDER, date(13), activities).unwrap()
    }

    #[test]
    fn same_record_twice_is_idempotent() {
        let mut graph = ScheduleGraph::new();
        let wo = record(vec![
            Activity::new(10, 2, Skill::MtnMech),
            Activity::new(20, 1, Skill::MtnElec),
        ]);

        let first = graph.ingest_work_order(&wo).unwrap();
        let (nodes, edges) = (graph.node_count(), graph.edge_count());
        let second = graph.ingest_work_order(&wo).unwrap();

        assert_eq!(first, second);
        assert_eq!(graph.node_count(), nodes);
        // composition + one finish-start relation
        assert_eq!(edges, 2);
        assert_eq!(graph.edge_count(), edges);

        let periods = graph.ingest_periods(&[date(13)]).unwrap();
        let edges = graph.edge_count();
        assert_eq!(graph.ingest_periods(&[date(13)]).unwrap(), periods);
        assert_eq!(graph.edge_count(), edges);
    }

    #[test]
    fn new_activity_extends_the_composition() {
        let mut graph = ScheduleGraph::new();
        let first = graph
            .ingest_work_order(&record(vec![Activity::new(10, 1, Skill::MtnMech)]))
            .unwrap();
        let second = graph
            .ingest_work_order(&record(vec![
                Activity::new(10, 1, Skill::MtnMech),
                Activity::new(20, 1, Skill::MtnMech),
            ]))
            .unwrap();

        assert_eq!(first.work_order, second.work_order);
        assert_eq!(second.activities[0], first.activities[0]);
        assert_eq!(graph.edges(EdgeKind::WorkOrderActivity).count(), 1);
        assert_eq!(
            graph.activities_of(second.work_order),
            Some(second.activities.as_slice())
        );
        assert_eq!(graph.edges(EdgeKind::ActivityRelation).count(), 1);
        assert!(graph.check_consistency());
    }

    #[test]
    fn failed_ingestion_rolls_back_created_nodes() {
        let mut graph = ScheduleGraph::new();
        graph
            .ingest_work_order(&record(vec![Activity::new(10, 2, Skill::MtnMech)]))
            .unwrap();
        let (nodes, edges) = (graph.node_count(), graph.edge_count());

        // Activity 5 is new; activity 10 contradicts the registered one.
        let conflicting = record(vec![
            Activity::new(5, 1, Skill::MtnElec),
            Activity::new(10, 3, Skill::MtnMech),
        ]);
        let result = graph.ingest_work_order(&conflicting);

        assert!(matches!(
            result,
            Err(GraphError::Registry(RegistryError::DuplicateIdentifier(_)))
        ));
        assert_eq!(graph.node_count(), nodes);
        assert_eq!(graph.edge_count(), edges);
        assert_eq!(
            graph.resolve(&ExternalKey::Activity {
                work_order_number: WORK_ORDER,
                activity_number: 5
            }),
            None
        );
        assert!(graph.check_consistency());
    }

    #[test]
    fn failed_extension_keeps_the_composition_id() {
        let mut graph = ScheduleGraph::new();
        let ingested = graph
            .ingest_work_order(&record(vec![
                Activity::new(10, 2, Skill::MtnMech),
                Activity::new(20, 1, Skill::MtnMech),
            ]))
            .unwrap();
        let (composition, _) = graph.composing_edge(ingested.activities[0]).unwrap();

        // Activity 30 is new; activity 20 contradicts the registered one.
        let conflicting = record(vec![
            Activity::new(10, 2, Skill::MtnMech),
            Activity::new(20, 3, Skill::MtnMech),
            Activity::new(30, 1, Skill::MtnMech),
        ]);
        assert!(graph.ingest_work_order(&conflicting).is_err());

        assert!(graph.contains_edge(composition));
        assert_eq!(
            graph.activities_of(ingested.work_order),
            Some(ingested.activities.as_slice())
        );
        assert_eq!(graph.edges(EdgeKind::ActivityRelation).count(), 1);
        assert!(graph.check_consistency());
    }

    #[test]
    fn technician_ingestion_registers_skills() {
        let mut graph = ScheduleGraph::new();
        let id = graph
            .ingest_technician(&technician(4, Skill::MtnElec))
            .unwrap();

        assert_eq!(graph.resolve(&ExternalKey::Technician(4)), Some(id));
        assert!(graph.resolve(&ExternalKey::Skill(Skill::MtnElec)).is_some());
        assert_eq!(
            graph.ingest_technician(&technician(4, Skill::MtnElec)).unwrap(),
            id
        );
    }

    #[test]
    fn changed_technician_is_a_conflict() {
        let mut graph = ScheduleGraph::new();
        graph
            .ingest_technician(&technician(4, Skill::MtnElec))
            .unwrap();
        let nodes = graph.node_count();

        let changed = Technician::builder(4)
            .add_skill(Skill::MtnMech)
            .add_availability(at(13, 7), at(13, 17))
            .unwrap()
            .build()
            .unwrap();
        assert!(graph.ingest_technician(&changed).is_err());
        // the MTN-MECH skill node created on the way is rolled back
        assert_eq!(graph.node_count(), nodes);
    }

    #[test]
    fn ingested_nodes_carry_record_attributes() {
        let mut graph = ScheduleGraph::new();
        let ingested = graph
            .ingest_work_order(&record(vec![Activity::new(10, 2, Skill::MtnMech)]))
            .unwrap();

        assert_eq!(
            graph.lookup(ingested.work_order).unwrap(),
            &Node::WorkOrder(WorkOrderNode::new(WORK_ORDER, date(13)))
        );
        assert_eq!(
            graph.lookup(ingested.activities[0]).unwrap(),
            &Node::Activity(ActivityNode::new(WORK_ORDER, 10, 2, Skill::MtnMech))
        );
        assert_eq!(
            graph.lookup(ingested.work_order).unwrap().kind(),
            NodeKind::WorkOrder
        );
    }
}

#[cfg(test)]
mod shared {
    use super::*;
    use std::thread;

    #[test]
    fn concurrent_commits_all_land() {
        let s = Scenario::new();
        let period = s.period;
        let graph = SharedScheduleGraph::new(s.graph);
        let work_orders: Vec<_> = (0..8)
            .map(|i| {
                graph
                    .register(Node::WorkOrder(WorkOrderNode::new(2000000000 + i, date(13))))
                    .unwrap()
            })
            .collect();

        thread::scope(|scope| {
            for &work_order in &work_orders {
                let graph = graph.clone();
                scope.spawn(move || {
                    graph
                        .commit(&ExcludeBuilder::new(work_order).period(period))
                        .unwrap();
                });
            }
            for _ in 0..4 {
                let graph = graph.clone();
                scope.spawn(move || {
                    for _ in 0..50 {
                        assert!(graph.read().check_consistency());
                    }
                });
            }
        });

        let graph = graph.read();
        assert_eq!(graph.edges(EdgeKind::Exclude).count(), 8);
        for work_order in work_orders {
            assert!(graph.excluded_periods(work_order).contains(&period));
        }
    }

    #[test]
    fn concurrent_replacements_all_land() {
        let mut s = Scenario::new();
        let next = s.graph.ingest_periods(&[date(27)]).unwrap()[0];
        let period = s.period;
        let graph = SharedScheduleGraph::new(s.graph);
        let excludes: Vec<_> = (0..8)
            .map(|i| {
                let work_order = graph
                    .register(Node::WorkOrder(WorkOrderNode::new(2000000000 + i, date(13))))
                    .unwrap();
                let edge = graph
                    .commit(&ExcludeBuilder::new(work_order).period(period))
                    .unwrap();
                (work_order, edge)
            })
            .collect();

        thread::scope(|scope| {
            for &(work_order, old) in &excludes {
                let graph = graph.clone();
                scope.spawn(move || {
                    graph
                        .replace(old, &ExcludeBuilder::new(work_order).period(next))
                        .unwrap();
                });
            }
            for _ in 0..4 {
                let graph = graph.clone();
                scope.spawn(move || {
                    for _ in 0..50 {
                        assert!(graph.read().check_consistency());
                    }
                });
            }
        });

        let graph = graph.read();
        assert_eq!(graph.edges(EdgeKind::Exclude).count(), 8);
        for (work_order, old) in excludes {
            assert!(!graph.contains_edge(old));
            assert_eq!(
                graph.excluded_periods(work_order).into_iter().collect::<Vec<_>>(),
                vec![next]
            );
        }
    }

    #[test]
    fn commit_surfaces_validation_errors() {
        let s = Scenario::new();
        let [t1, _, t3] = s.technicians;
        let builder = AssignmentBuilder::new(s.activity, s.period)
            .technicians([t1, t3])
            .day(s.day(13));
        let graph = SharedScheduleGraph::new(s.graph);

        assert!(matches!(
            graph.commit(&builder),
            Err(GraphError::Validation(ValidationError::SkillMismatch { .. }))
        ));
        assert_eq!(graph.read().edges(EdgeKind::Assignment).count(), 0);
    }

    #[test]
    fn shared_replace_and_retire() {
        let s = Scenario::new();
        let first = team_assignment(&s, &[13]);
        let second = team_assignment(&s, &[14]);
        let graph = SharedScheduleGraph::new(s.graph);

        let old = graph.commit(&first).unwrap();
        let new = graph.replace(old, &second).unwrap();
        assert!(graph.read().edge(old).is_none());
        assert_eq!(graph.retire(new).unwrap().kind(), EdgeKind::Assignment);
        assert_eq!(graph.read().edge_count(), 2);
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Exclude(u8),
        Assign(u32),
        Relate(bool),
        Retire(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u8..8).prop_map(Op::Exclude),
            (13u32..18).prop_map(Op::Assign),
            any::<bool>().prop_map(Op::Relate),
            (0usize..8).prop_map(Op::Retire),
        ]
    }

    proptest! {
        #[test]
        fn committed_assignments_hold_their_invariants(
            mask in 0u8..8,
            first in 13u32..27,
            len in 1u32..4,
        ) {
            let mut s = Scenario::new();
            let technicians: Vec<_> = (0..3)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| s.technicians[i])
                .collect();
            let days: Vec<u32> = (first..(first + len).min(27)).collect();
            let builder = AssignmentBuilder::new(s.activity, s.period)
                .technicians(technicians.iter().copied())
                .days(days.iter().map(|&d| s.day(d)));
            let edges = s.graph.edge_count();

            let expected = mask == 0b011 && days.iter().all(|&d| d <= 17);
            match s.graph.add(&builder) {
                Ok(id) => {
                    prop_assert!(expected);
                    let assignment = s.graph.edge(id).unwrap().as_assignment().unwrap();
                    prop_assert_eq!(assignment.technicians().len(), 2);
                    for &t in assignment.technicians() {
                        let tech = s.graph.lookup(t).unwrap().as_technician().unwrap();
                        prop_assert!(tech.has_skill(Skill::MtnMech));
                    }
                }
                Err(_) => {
                    prop_assert!(!expected);
                    prop_assert_eq!(s.graph.edge_count(), edges);
                }
            }
            prop_assert!(s.graph.check_consistency());
        }

        #[test]
        fn index_matches_edges_under_insert_and_retire(ops in prop::collection::vec(op(), 1..40)) {
            let mut s = Scenario::new();
            let starts = [date(13), date(27), NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 24).unwrap()];
            let periods = s.graph.ingest_periods(&starts).unwrap();
            let other = WorkOrder::new(
                WORK_ORDER + 1,
                date(13),
                vec![Activity::new(10, 1, Skill::MtnMech), Activity::new(20, 1, Skill::MtnElec)],
            )
            .unwrap();
            let ingested = s.graph.ingest_work_order(&other).unwrap();
            let (a, b) = (ingested.activities[0], ingested.activities[1]);
            let baseline = s.graph.edge_count();
            let mut live: Vec<(EdgeId, EdgeKind)> = Vec::new();

            for op in ops {
                match op {
                    Op::Exclude(mask) => {
                        // never the scenario period, which assignments use
                        let chosen = (0..3)
                            .filter(|i| mask & (1 << i) != 0)
                            .map(|i| periods[i + 1]);
                        let id = s.graph
                            .add(&ExcludeBuilder::new(s.work_order).periods(chosen))
                            .unwrap();
                        live.push((id, EdgeKind::Exclude));
                    }
                    Op::Assign(day) => {
                        let builder = team_assignment(&s, &[day]);
                        let id = s.graph.add(&builder).unwrap();
                        live.push((id, EdgeKind::Assignment));
                    }
                    Op::Relate(forward) => {
                        let (from, to) = if forward { (a, b) } else { (b, a) };
                        let id = s.graph.add(&ActivityRelationBuilder::new(from, to)).unwrap();
                        live.push((id, EdgeKind::ActivityRelation));
                    }
                    Op::Retire(index) if !live.is_empty() => {
                        let (id, _) = live.remove(index % live.len());
                        s.graph.retire(id).unwrap();
                    }
                    Op::Retire(_) => {}
                }
                let live_of = |kind: EdgeKind| live.iter().filter(|(_, k)| *k == kind).count();

                prop_assert!(s.graph.check_consistency());
                prop_assert_eq!(s.graph.edge_count(), baseline + live.len());
                prop_assert_eq!(
                    s.graph.edges_of_kind(s.work_order, EdgeKind::Exclude).count(),
                    live_of(EdgeKind::Exclude)
                );
                prop_assert_eq!(
                    s.graph.assignments_for_activity(s.activity).count(),
                    live_of(EdgeKind::Assignment)
                );
                prop_assert_eq!(
                    s.graph.assignments_for_period(s.period).count(),
                    live_of(EdgeKind::Assignment)
                );
                // the ingested finish-start link plus every added one
                prop_assert_eq!(
                    s.graph.edges_of_kind(a, EdgeKind::ActivityRelation).count(),
                    live_of(EdgeKind::ActivityRelation) + 1
                );
                prop_assert_eq!(s.graph.period_days(s.period).map(<[_]>::len), Some(14));
                prop_assert_eq!(s.graph.work_order_of(a), s.graph.work_order_of(b));
            }
        }
    }
}

#[test]
fn period_nodes_keep_start_dates() {
    let s = Scenario::new();
    assert_eq!(
        s.graph.lookup(s.period).unwrap().as_period(),
        Some(Period::from_start_date(date(13)))
    );
}
