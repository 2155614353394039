//! End-to-end: raw CSV export in, cleaned table out.

use chrono::NaiveDate;
use joblist::{
    clean_bytes, clean_csv_file, export, parse_csv_str, CleanOptions, JobId, Pipeline,
    PipelineConfig, PipelineError, TableError,
};
use serde_json::{json, Value};

const HEADER: &str = "Job ID,Job Title,Company,Reviews,Location,Experience,Salary,Posted On,Openings,Applications,Job Description,Role,Industry Type,Department,Employment Type,Role Category,Education,Key Skills";

fn fixture() -> String {
    let rows = [
        r#"101,Data Analyst,Hiring for Acme Analytics,120 Reviews,"Bengaluru(Whitefield), Bengaluru",2 - 5 years,3 - 5 Lacs P.A.,5 days ago,2,less than 10,Analyse data,Analyst,IT Services,Data Science,"Full Time, Permanent",Analytics,"UG: B.Tech/B.E. in Any Specialization
PG: Post Graduation Not Required","SQL, Python, python, Excel""#,
        r#"102,Backend Engineer,Globex,,"Pune, Mumbai (All Areas), pune",3 years,Not Disclosed,30+ days ago,1,25,Build APIs,Engineer,Software Product,Engineering,"Full Time, Permanent",Software Development,"UG: BCA in Computers
PG: MCA in Computers
Doctorate: Doctorate Not Required",Java"#,
        r#"103,Intern,Initech,,Remote,Fresher,"50,000 - 1 Lacs P.A.",1 day ago,5,abc,Learn,Intern,Education,Training,Internship,Other,,"#,
        r#"104,Sales Lead,Umbrella,,Delhi (NCR),10 - 15 years,"50,000 - 1 Lacs P.A.",Just Now,1,"1,204",Sell,Sales,Retail,Sales,"Full Time, Permanent",Retail Sales,UG: Any Graduate,"#,
    ];
    format!("{}\n{}\n", HEADER, rows.join("\n"))
}

fn config() -> PipelineConfig {
    PipelineConfig::default()
}

fn row_by_id<'a>(rows: &'a [Value], id: &str) -> &'a Value {
    rows.iter()
        .find(|r| r["Job ID"] == json!(id))
        .unwrap_or_else(|| panic!("job {id} missing"))
}

#[test]
fn test_cleans_fixture_end_to_end() {
    let result = clean_bytes(fixture().as_bytes(), config(), CleanOptions::default()).unwrap();
    let rows = result.table.to_json_records();

    // "Fresher" fails the experience pattern
    assert_eq!(result.report.rows_in, 4);
    assert_eq!(rows.len(), 3);
    assert_eq!(result.report.dropped.len(), 1);
    assert_eq!(result.report.dropped[0].job_id, Some(JobId::Text("103".into())));
    assert_eq!(result.invalid_count, 0, "{:?}", result.validation_errors);
    assert_eq!(result.valid_count, 3);

    let a = row_by_id(&rows, "101");
    assert_eq!(a["Company"], "Acme Analytics");
    assert_eq!(a["Min_Experience"], 2);
    assert_eq!(a["Max_Experience"], 5);
    assert_eq!(a["Min_Salary"], 300000.0);
    assert_eq!(a["Max_Salary"], 500000.0);
    assert_eq!(a["Average_Salary"], 400000.0);
    assert_eq!(a["Days Posted On"], 5);
    assert_eq!(a["Date Posted"], "05-09-2024");
    assert_eq!(a["Applications"], 9);
    assert_eq!(a["UG"], "B.Tech/B.E.");
    assert_eq!(a["PG"], "Not Specified");
    assert_eq!(a["Doctorate"], "Not Specified");
    assert_eq!(a["Location"], json!(["bengaluru"]));
    assert_eq!(a["Key Skills"], json!(["excel", "python", "sql"]));

    let b = row_by_id(&rows, "102");
    // Single value: max stays 0
    assert_eq!(b["Min_Experience"], 3);
    assert_eq!(b["Max_Experience"], 0);
    assert_eq!(b["Min_Salary"], Value::Null);
    assert_eq!(b["Max_Salary"], Value::Null);
    assert_eq!(b["Average_Salary"], Value::Null);
    assert_eq!(b["Days Posted On"], 31);
    assert_eq!(b["Date Posted"], "10-08-2024");
    assert_eq!(b["Applications"], 25);
    assert_eq!(b["UG"], "BCA");
    assert_eq!(b["PG"], "MCA");
    assert_eq!(b["Doctorate"], "Not Specified");
    assert_eq!(b["Location"], json!(["mumbai", "pune"]));
    assert_eq!(b["Key Skills"], json!(["java"]));

    let d = row_by_id(&rows, "104");
    assert_eq!(d["Min_Salary"], 50000.0);
    assert_eq!(d["Max_Salary"], 100000.0);
    assert_eq!(d["Days Posted On"], 0);
    assert_eq!(d["Date Posted"], "10-09-2024");
    assert_eq!(d["Applications"], 1204);
    assert_eq!(d["UG"], "Any Graduate");
    assert_eq!(d["PG"], "Not Specified");
    assert_eq!(d["Location"], json!(["delhi"]));
    assert_eq!(d["Key Skills"], json!([]));
}

#[test]
fn test_typed_output() {
    let result = clean_bytes(fixture().as_bytes(), config(), CleanOptions::default()).unwrap();
    let jobs = result.table.to_clean_jobs().unwrap();

    assert_eq!(jobs.len(), 3);
    assert!(jobs[0].has_salary());
    assert!(!jobs[1].has_salary());
    assert_eq!(jobs[1].date_posted, NaiveDate::from_ymd_opt(2024, 8, 10).unwrap());
    assert_eq!(jobs[2].applications, Some(1204));
    assert_eq!(jobs[0].other["Role"], "Analyst");
}

#[test]
fn test_reference_date_from_config() {
    let config = config().with_reference_date_str("15-01-2025").unwrap();
    let result = clean_bytes(fixture().as_bytes(), config, CleanOptions::default()).unwrap();
    let rows = result.table.to_json_records();

    assert_eq!(row_by_id(&rows, "101")["Date Posted"], "10-01-2025");
}

#[test]
fn test_rerunning_list_cleanup_is_stable() {
    let first = clean_bytes(fixture().as_bytes(), config(), CleanOptions::default()).unwrap();
    let csv = export::to_csv_string(&first.table).unwrap();

    // Feed the cleaned locations back through the loader and the list stage
    let mut reloaded = parse_csv_str(&csv, ',').unwrap().table;
    joblist::transform::expand_and_aggregate(
        &mut reloaded,
        "Location",
        joblist::transform::fields::clean_location,
    );

    for (before, after) in first.table.rows.iter().zip(&reloaded.rows) {
        assert_eq!(before["Location"], after["Location"]);
    }
}

#[test]
fn test_missing_columns_fail_before_processing() {
    let csv = "Job ID,Experience\n1,2 - 5 years\n";
    let table = parse_csv_str(csv, ',').unwrap().table;
    let err = Pipeline::new(config()).unwrap().run(table).unwrap_err();

    match err {
        PipelineError::Table(TableError::MissingColumns(cols)) => {
            assert_eq!(cols.len(), 16);
            assert!(cols.contains(&"Salary".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_clean_csv_file_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("jobs.csv");
    std::fs::write(&input, fixture()).unwrap();

    let result = clean_csv_file(&input, config(), CleanOptions::default()).unwrap();
    let info = result.csv_info.as_ref().unwrap();
    assert_eq!(info.delimiter, ',');
    assert_eq!(info.row_count, 4);

    let output = dir.path().join("clean.json");
    export::write_to_path(&result.table, &output, export::ExportFormat::Json).unwrap();
    let written: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written.len(), 3);
    assert!(written.iter().all(joblist::is_valid_clean_job));
}

#[test]
fn test_empty_export_is_rejected() {
    let err = clean_bytes(format!("{}\n", HEADER).as_bytes(), config(), CleanOptions::default())
        .unwrap_err();
    assert!(matches!(err, PipelineError::EmptyInput));
}
