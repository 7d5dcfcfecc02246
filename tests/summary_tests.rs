use resourceflow::{
    Allocation, DashboardKpis, Heatmap, Resource, ResourceSummary, Snapshot, UtilizationStatus,
    WeekKey, allocated_hours_for, summarize_resources,
};

fn week(raw: &str) -> WeekKey {
    raw.parse().unwrap()
}

fn snapshot() -> Snapshot {
    let mut inactive = Resource::new("r3", "Cy");
    inactive.is_active = false;
    let mut deleted = Resource::new("r4", "Di");
    deleted.is_deleted = true;
    let mut part_time = Resource::new("r2", "Bo");
    part_time.weekly_capacity = 20.0;

    Snapshot::new(
        vec![Resource::new("r1", "Ana"), part_time, inactive, deleted],
        vec![
            Allocation::weekly("r1", "p1", [("2024-W29", 20.0), ("2024-W30", 40.0)]),
            Allocation::weekly("r1", "p2", [("2024-W29", 16.0)]),
            Allocation::flat("r2", "p1", 22.0),
            Allocation::flat("r3", "p1", 10.0),
            Allocation::flat("r4", "p1", 10.0),
        ],
    )
}

#[test]
fn summary_counts_hours_and_projects_for_week() {
    let snap = snapshot();
    let w29 = week("2024-W29");
    let w30 = week("2024-W30");

    let s = ResourceSummary::build(&snap.resources[0], &snap.allocations, Some(&w29));
    assert_eq!(s.allocated_hours, 36.0);
    assert_eq!(s.project_count, 2);
    assert_eq!(s.status(), UtilizationStatus::NearCapacity);

    let s = ResourceSummary::build(&snap.resources[0], &snap.allocations, Some(&w30));
    assert_eq!(s.allocated_hours, 40.0);
    assert_eq!(s.project_count, 1);

    let s = ResourceSummary::build(&snap.resources[0], &snap.allocations, Some(&week("2024-W31")));
    assert_eq!(s.project_count, 0);
    assert_eq!(s.status(), UtilizationStatus::Unassigned);
}

#[test]
fn summary_hours_match_per_resource_totals() {
    let snap = snapshot();
    let weeks = [Some(week("2024-W29")), Some(week("2024-W30")), Some(week("2024-W31")), None];
    for resource in &snap.resources {
        for selected in &weeks {
            let summary = ResourceSummary::build(resource, &snap.allocations, selected.as_ref());
            let key = selected.map(|w| w.to_string());
            assert_eq!(
                summary.allocated_hours,
                allocated_hours_for(&resource.id, &snap.allocations, key.as_deref()),
                "{} in {:?}",
                resource.id,
                key
            );
        }
    }
}

#[test]
fn deleted_resources_are_excluded() {
    let summaries = summarize_resources(&snapshot(), Some(&week("2024-W29")));
    let ids: Vec<_> = summaries.iter().map(|s| s.resource.id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2", "r3"]);
    assert_eq!(summaries[1].status(), UtilizationStatus::OverCapacity);
    assert_eq!(summaries[2].status(), UtilizationStatus::Inactive);
}

#[test]
fn kpis_from_summaries() {
    let summaries = summarize_resources(&snapshot(), Some(&week("2024-W29")));
    let kpis = DashboardKpis::from_summaries(&summaries);
    assert_eq!(kpis.total_resources, 3);
    assert_eq!(kpis.active_resources, 2);
    assert_eq!(kpis.over_allocated_resources, 1);
    assert_eq!(kpis.unassigned_resources, 0);
    assert_eq!(kpis.total_capacity_hours, 60.0);
    assert_eq!(kpis.total_allocated_hours, 58.0);
    assert!((kpis.average_utilization - (90.0 + 110.0) / 2.0).abs() < 1e-9);
    assert_eq!(kpis.status_counts[&UtilizationStatus::Inactive], 1);
    assert_eq!(kpis.status_counts[&UtilizationStatus::Critical], 0);

    let json = serde_json::to_value(&kpis).unwrap();
    assert_eq!(json["status_counts"]["near-capacity"], 1);
}

#[test]
fn kpis_of_nothing_are_zero() {
    let kpis = DashboardKpis::from_summaries(&[]);
    assert_eq!(kpis.total_resources, 0);
    assert_eq!(kpis.average_utilization, 0.0);
    assert!(kpis.to_cli_summary().contains("resources=0"));
}

#[test]
fn heatmap_rows_and_cells() {
    let heatmap = Heatmap::starting_at(&snapshot(), week("2024-W29"), 3);
    assert_eq!(heatmap.weeks.len(), 3);
    assert_eq!(heatmap.rows.len(), 3);

    let ana = &heatmap.rows[0];
    let statuses: Vec<_> = ana.cells.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![
            UtilizationStatus::NearCapacity,
            UtilizationStatus::NearCapacity,
            UtilizationStatus::Unassigned,
        ]
    );
    assert!(heatmap.rows[2].cells.iter().all(|c| c.status == UtilizationStatus::Inactive));
}

#[test]
fn heatmap_dataframe_has_one_column_per_week() {
    let heatmap = Heatmap::starting_at(&snapshot(), week("2024-W29"), 2);
    let df = heatmap.to_dataframe().unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 4);

    let w29 = df.column("2024-W29").unwrap().f64().unwrap();
    assert_eq!(w29.get(0), Some(90.0));
    assert!((w29.get(1).unwrap() - 110.0).abs() < 1e-9);
    let ids = df.column("resource_id").unwrap().str().unwrap();
    assert_eq!(ids.get(2), Some("r3"));
}
