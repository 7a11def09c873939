//! Integration tests for cloning a whole project.

use assert_matches::assert_matches;
use sqlx::PgPool;
use wr_core::custom_fields::{CustomSchema, EntityKind, Metadata};
use wr_db::models::port::PortInput;
use wr_db::models::project::CreateProject;
use wr_db::models::sfp::SfpInput;
use wr_db::models::switch::SwitchInput;
use wr_db::repositories::{NetworkCloneRepo, PortRepo, ProjectRepo, SfpRepo, SwitchRepo};
use wr_db::CloneError;

/// Build "LabA": WRS-1 (Grandmaster) and WRS-2 (Slave), SFP-100 and SFP-200,
/// WRS-1 port 1 with SFP-100 linked to WRS-2 port 1 which carries SFP-200.
async fn seed_lab(pool: &PgPool) -> i64 {
    let mut schema = CustomSchema::new();
    schema.add_field(EntityKind::Switch, "rack").unwrap();
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: "LabA".to_string(),
            custom_schema: Some(schema),
        },
    )
    .await
    .unwrap();

    let mut metadata = Metadata::new();
    metadata.insert("rack".to_string(), "R1".to_string());
    let gm = SwitchRepo::upsert(
        pool,
        project.id,
        &SwitchInput {
            name: "WRS-1".to_string(),
            role: "Grandmaster".to_string(),
            ip_address: Some("10.0.0.1".to_string()),
            mac: Some("AA:BB:CC:00:00:01".to_string()),
            clock_source: Some("GPS".to_string()),
            remarks: None,
            metadata,
        },
    )
    .await
    .unwrap();
    let slave = SwitchRepo::upsert(
        pool,
        project.id,
        &SwitchInput {
            name: "WRS-2".to_string(),
            role: "Slave".to_string(),
            ip_address: None,
            mac: None,
            clock_source: None,
            remarks: None,
            metadata: Metadata::new(),
        },
    )
    .await
    .unwrap();

    let sfp_a = SfpRepo::create(pool, project.id, &sfp("SFP-100", 5.0, -3.0))
        .await
        .unwrap();
    let sfp_b = SfpRepo::create(pool, project.id, &sfp("SFP-200", 1.0, 1.0))
        .await
        .unwrap();

    let mut gm_port = port(gm.id, 1);
    gm_port.sfp_id = Some(sfp_a.id);
    gm_port.remote_sfp_id = Some(sfp_b.id);
    gm_port.connected_to_id = Some(slave.id);
    gm_port.connected_port_num = Some(1);
    gm_port.port_delta_tx = 1.0;
    gm_port.port_delta_rx = 0.5;
    gm_port.vlan = Some(100);
    PortRepo::create(pool, project.id, &gm_port).await.unwrap();

    let mut slave_port = port(slave.id, 1);
    slave_port.sfp_id = Some(sfp_b.id);
    slave_port.connected_to_id = Some(gm.id);
    slave_port.connected_port_num = Some(1);
    PortRepo::create(pool, project.id, &slave_port)
        .await
        .unwrap();

    project.id
}

fn sfp(serial: &str, delta_tx: f64, delta_rx: f64) -> SfpInput {
    SfpInput {
        serial: serial.to_string(),
        wavelength: Some("1310".to_string()),
        channel: Some("C34".to_string()),
        alpha: 2.6e-4,
        delta_tx,
        delta_rx,
        remarks: None,
        metadata: Metadata::new(),
    }
}

fn port(switch_id: i64, port_num: i32) -> PortInput {
    PortInput {
        switch_id,
        port_num,
        sfp_id: None,
        remote_sfp_id: None,
        connected_to_id: None,
        connected_port_num: None,
        port_delta_tx: 0.0,
        port_delta_rx: 0.0,
        vlan: None,
        remarks: None,
        metadata: Metadata::new(),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn clone_copies_counts_and_schema(pool: PgPool) {
    let source_id = seed_lab(&pool).await;

    let summary = NetworkCloneRepo::clone_project(&pool, source_id, "LabA-Copy")
        .await
        .unwrap();

    assert_eq!(summary.project.name, "LabA-Copy");
    assert_ne!(summary.project.id, source_id);
    assert_eq!((summary.switches, summary.sfps, summary.ports), (2, 2, 2));
    assert_eq!(summary.skipped_ports, 0);
    assert_eq!(
        summary.project.custom_schema.0.fields(EntityKind::Switch),
        ["rack"]
    );

    let src = ProjectRepo::counts(&pool, source_id).await.unwrap();
    let dst = ProjectRepo::counts(&pool, summary.project.id).await.unwrap();
    assert_eq!(src, dst);
}

#[sqlx::test(migrations = "./migrations")]
async fn cloned_references_resolve_inside_new_project(pool: PgPool) {
    let source_id = seed_lab(&pool).await;
    let summary = NetworkCloneRepo::clone_project(&pool, source_id, "LabA-Copy")
        .await
        .unwrap();
    let new_id = summary.project.id;

    let src_switches = SwitchRepo::list_by_project(&pool, source_id).await.unwrap();
    let new_switches = SwitchRepo::list_by_project(&pool, new_id).await.unwrap();
    let new_sfps = SfpRepo::list_by_project(&pool, new_id).await.unwrap();

    for port in PortRepo::list_by_project(&pool, new_id).await.unwrap() {
        let owner = new_switches.iter().find(|s| s.id == port.switch_id);
        assert!(owner.is_some(), "local switch must be in the new project");

        if let Some(remote) = port.connected_to_id {
            assert!(new_switches.iter().any(|s| s.id == remote));
            assert!(!src_switches.iter().any(|s| s.id == remote));
        }
        for sfp_id in [port.sfp_id, port.remote_sfp_id].into_iter().flatten() {
            assert!(new_sfps.iter().any(|s| s.id == sfp_id));
        }
    }

    // Same names, link for link.
    let detailed = PortRepo::list_detailed_by_project(&pool, new_id)
        .await
        .unwrap();
    let gm_port = detailed.iter().find(|p| p.switch_name == "WRS-1").unwrap();
    assert_eq!(gm_port.remote_switch_name.as_deref(), Some("WRS-2"));
    assert_eq!(gm_port.sfp_serial.as_deref(), Some("SFP-100"));
    assert_eq!(gm_port.remote_sfp_serial.as_deref(), Some("SFP-200"));
    assert_eq!(gm_port.port.connected_port_num, Some(1));
    assert_eq!(gm_port.port.vlan, Some(100));
    assert_eq!(gm_port.port.port_delta_tx, 1.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn clone_preserves_switch_attributes(pool: PgPool) {
    let source_id = seed_lab(&pool).await;
    let summary = NetworkCloneRepo::clone_project(&pool, source_id, "LabA-Copy")
        .await
        .unwrap();

    let copy = SwitchRepo::find_by_name(&pool, summary.project.id, "WRS-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(copy.role, "Grandmaster");
    assert_eq!(copy.ip_address.as_deref(), Some("10.0.0.1"));
    assert_eq!(copy.mac.as_deref(), Some("AA:BB:CC:00:00:01"));
    assert_eq!(copy.clock_source.as_deref(), Some("GPS"));
    assert_eq!(copy.metadata.0.get("rack").map(String::as_str), Some("R1"));
}

#[sqlx::test(migrations = "./migrations")]
async fn clone_is_independent_of_source(pool: PgPool) {
    let source_id = seed_lab(&pool).await;
    let summary = NetworkCloneRepo::clone_project(&pool, source_id, "LabA-Copy")
        .await
        .unwrap();

    assert!(ProjectRepo::delete(&pool, source_id).await.unwrap());

    let counts = ProjectRepo::counts(&pool, summary.project.id).await.unwrap();
    assert_eq!((counts.switches, counts.sfps, counts.ports), (2, 2, 2));
}

#[sqlx::test(migrations = "./migrations")]
async fn clone_onto_existing_name_fails_without_writing(pool: PgPool) {
    let source_id = seed_lab(&pool).await;
    ProjectRepo::create(
        &pool,
        &CreateProject {
            name: "Taken".to_string(),
            custom_schema: None,
        },
    )
    .await
    .unwrap();
    let before = ProjectRepo::list(&pool).await.unwrap().len();

    let err = NetworkCloneRepo::clone_project(&pool, source_id, "Taken")
        .await
        .unwrap_err();
    assert_matches!(err, CloneError::DuplicateName(name) if name == "Taken");

    // Cloning onto the source's own name is a collision too.
    let err = NetworkCloneRepo::clone_project(&pool, source_id, "LabA")
        .await
        .unwrap_err();
    assert_matches!(err, CloneError::DuplicateName(_));

    assert_eq!(ProjectRepo::list(&pool).await.unwrap().len(), before);
}

#[sqlx::test(migrations = "./migrations")]
async fn clone_of_missing_project_fails(pool: PgPool) {
    let err = NetworkCloneRepo::clone_project(&pool, 999_999, "Nowhere")
        .await
        .unwrap_err();
    assert_matches!(err, CloneError::SourceNotFound(999_999));
    assert!(ProjectRepo::find_by_name(&pool, "Nowhere")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn clone_rejects_blank_name(pool: PgPool) {
    let source_id = seed_lab(&pool).await;
    let err = NetworkCloneRepo::clone_project(&pool, source_id, "   ")
        .await
        .unwrap_err();
    assert_matches!(err, CloneError::Invalid(_));
}

#[sqlx::test(migrations = "./migrations")]
async fn clone_of_empty_project(pool: PgPool) {
    let empty = ProjectRepo::create(
        &pool,
        &CreateProject {
            name: "Empty".to_string(),
            custom_schema: None,
        },
    )
    .await
    .unwrap();

    let summary = NetworkCloneRepo::clone_project(&pool, empty.id, "Empty-Copy")
        .await
        .unwrap();
    assert_eq!((summary.switches, summary.sfps, summary.ports), (0, 0, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn port_on_foreign_switch_is_skipped(pool: PgPool) {
    let source_id = seed_lab(&pool).await;
    let other = ProjectRepo::create(
        &pool,
        &CreateProject {
            name: "Other".to_string(),
            custom_schema: None,
        },
    )
    .await
    .unwrap();
    let foreign = SwitchRepo::upsert(
        &pool,
        other.id,
        &SwitchInput {
            name: "WRS-X".to_string(),
            role: "Slave".to_string(),
            ip_address: None,
            mac: None,
            clock_source: None,
            remarks: None,
            metadata: Metadata::new(),
        },
    )
    .await
    .unwrap();
    // The repository does not check project membership; handlers do.
    PortRepo::create(&pool, source_id, &port(foreign.id, 5))
        .await
        .unwrap();

    let summary = NetworkCloneRepo::clone_project(&pool, source_id, "LabA-Copy")
        .await
        .unwrap();
    assert_eq!(summary.ports, 2);
    assert_eq!(summary.skipped_ports, 1);

    let copied = PortRepo::list_by_project(&pool, summary.project.id)
        .await
        .unwrap();
    assert_eq!(copied.len(), 2);
    assert!(copied.iter().all(|p| p.switch_id != foreign.id));
    assert!(copied.iter().all(|p| p.port_num == 1));
}

#[sqlx::test(migrations = "./migrations")]
async fn failed_port_copy_rolls_back_everything(pool: PgPool) {
    let source_id = seed_lab(&pool).await;

    sqlx::raw_sql(
        "CREATE FUNCTION reject_port_insert() RETURNS trigger AS $$
         BEGIN
             RAISE EXCEPTION 'port insert rejected';
         END
         $$ LANGUAGE plpgsql;
         CREATE TRIGGER reject_port_insert BEFORE INSERT ON ports
             FOR EACH ROW EXECUTE FUNCTION reject_port_insert();",
    )
    .execute(&pool)
    .await
    .unwrap();

    let err = NetworkCloneRepo::clone_project(&pool, source_id, "LabA-Copy")
        .await
        .unwrap_err();
    assert_matches!(err, CloneError::Failed(sqlx::Error::Database(_)));

    assert!(ProjectRepo::find_by_name(&pool, "LabA-Copy")
        .await
        .unwrap()
        .is_none());
    assert_eq!(ProjectRepo::list(&pool).await.unwrap().len(), 1);

    let (switches, sfps, ports): (i64, i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM switches),
                (SELECT COUNT(*) FROM sfps),
                (SELECT COUNT(*) FROM ports)",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((switches, sfps, ports), (2, 2, 2));
}
