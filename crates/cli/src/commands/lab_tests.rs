use super::*;

#[test]
fn usage_flag_fixes_both_bounds() {
    let mut config = LabConfig::default();
    let args = LabArgs {
        usage: Some(Duration::from_millis(5)),
        stations: Some(2),
        ..LabArgs::default()
    };

    args.apply(&mut config);

    assert_eq!(config.usage_min, Duration::from_millis(5));
    assert_eq!(config.usage_max, Duration::from_millis(5));
    assert_eq!(config.stations, 2);
    assert_eq!(config.students, 6);
}

#[test]
fn numbered_flag_cannot_unset_file_value() {
    let mut config = LabConfig {
        numbered: true,
        ..LabConfig::default()
    };

    LabArgs::default().apply(&mut config);

    assert!(config.numbered);
}

#[test]
fn students_are_numbered_from_one() {
    let config = LabConfig {
        students: 3,
        ..LabConfig::default()
    };

    let students = build_students(&config).unwrap();

    let names: Vec<&str> = students.iter().map(Student::name).collect();
    assert_eq!(names, ["1", "2", "3"]);
}

#[tokio::test]
async fn zero_stations_are_rejected() {
    let args = LabArgs {
        stations: Some(0),
        ..LabArgs::default()
    };

    assert!(handle(args, LabConfig::default()).await.is_err());
}

#[tokio::test]
async fn instant_lab_completes() {
    let args = LabArgs {
        usage: Some(Duration::ZERO),
        numbered: true,
        ..LabArgs::default()
    };

    handle(args, LabConfig::default()).await.unwrap();
}
