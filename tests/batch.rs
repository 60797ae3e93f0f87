//! End-to-end batch runs over a workbook directory.

use std::fs;
use std::path::Path;

use tetris_tree::{BatchRunner, JobStatus, Workbook, parse_commands};

const COMMANDS: &str = "\
active,input_sheet,output_svgfile,levels,area,quality,color_sheet,rule1,bg_color1,fg_color1,rule2,bg_color2,fg_color2
,Staff,staff,\"division,dept\",fte,score,Colors,>80,good,,,neutral,
#,Staff,disabled,division,fte,score,Colors,,neutral,,,,
,Staff,bad_levels,\"division,team\",fte,score,Colors,,neutral,,,,
,Staff,no_colors,division,fte,score,Palette,,neutral,,,,
,Missing,no_input,division,fte,score,Colors,,neutral,,,,
,Staff,bad_rules,division,fte,score,Colors,>high,good,,,neutral,
";

const STAFF: &str = "\
division,dept,fte,score
Ops,Support,3,90
Ops,Logistics,1,50
R&D,Labs,4,85
R&D,Tooling,0,10
";

const COLORS: &str = "\
color,pf_color,hex
good,pf_good,#27ae60
neutral,,#bdc3c7
";

fn workbook(dir: &Path) -> Workbook {
    fs::write(dir.join("Commands.csv"), COMMANDS).unwrap();
    fs::write(dir.join("Staff.csv"), STAFF).unwrap();
    fs::write(dir.join("Colors.csv"), COLORS).unwrap();
    Workbook::open(dir).unwrap()
}

#[test]
fn test_batch_recovers_per_job() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let workbook = workbook(input.path());

    let jobs = parse_commands(&workbook.sheet("Commands").unwrap()).unwrap();
    assert_eq!(jobs.len(), 6);

    let report = BatchRunner::new(workbook, output.path()).run(&jobs);
    assert_eq!(report.outcomes.len(), 6);
    assert_eq!(report.written(), 1);
    assert_eq!(report.problems(), 4);

    let statuses: Vec<&JobStatus> = report.outcomes.iter().map(|o| &o.status).collect();
    assert!(matches!(statuses[0], JobStatus::Written { .. }));
    assert_eq!(*statuses[1], JobStatus::Inactive);
    for (i, needle) in [(2, "team"), (3, "Palette"), (4, "Missing"), (5, ">high")] {
        match statuses[i] {
            JobStatus::Skipped { reason } => assert!(reason.contains(needle), "{reason}"),
            other => panic!("job {i}: unexpected status {other:?}"),
        }
    }

    let svg = fs::read_to_string(output.path().join("staff.svg")).unwrap();
    assert!(svg.contains("<title>Tetris Tree / Voronoi Diagram for Staff</title>"));
    assert!(svg.contains(r##"fill="#27ae60""##));
    assert!(svg.contains(r#"data-levels="division/dept""#));
    // Tooling has zero weight and is dropped from the picture
    assert!(!svg.contains(">Tooling<"));
    assert!(svg.contains(">Labs<"));
    assert!(!output.path().join("disabled.svg").exists());

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains(r#""status":"written""#));
    assert!(json.contains(r#""status":"inactive""#));
}
