//! CLI integration tests

use std::io::Write;
use std::process::{Command, Output};

const RI_FUTURE_1_EVENT_ID: &str = "554ba76af26581e5a4842adbae52bd81df81db5ae0d9019f94d2e6ab";
const RI_FUTURE_2_EVENT_ID: &str = "fca0503806ee52483ed8523a41dde1a2ed8eed725e80384247c53d77";

const LISTING: &str = r#"{
    "ReservedInstances": [
        {
            "ReservedInstancesId": "ri-future-1",
            "InstanceCount": 2,
            "InstanceType": "m5.large",
            "ProductDescription": "Linux/UNIX",
            "Scope": "Region",
            "Duration": 94608000,
            "OfferingType": "No Upfront",
            "End": "2999-01-01T00:00:00+00:00",
            "State": "active"
        },
        {
            "ReservedInstancesId": "ri-future-2",
            "InstanceCount": 1,
            "InstanceType": "m5.2xlarge",
            "ProductDescription": "Linux/UNIX",
            "Scope": "Region",
            "Duration": 94608000,
            "OfferingType": "No Upfront",
            "End": "2999-06-01T00:00:00+00:00",
            "State": "active"
        },
        {
            "ReservedInstancesId": "ri-expired",
            "InstanceCount": 8,
            "InstanceType": "c5.xlarge",
            "ProductDescription": "Linux/UNIX",
            "Scope": "Availability Zone",
            "AvailabilityZone": "us-east-1a",
            "Duration": 31536000,
            "OfferingType": "All Upfront",
            "End": "2001-01-01T00:00:00+00:00",
            "State": "retired"
        }
    ]
}"#;

struct Fixture {
    home: tempfile::TempDir,
    listing: tempfile::NamedTempFile,
}

impl Fixture {
    fn new(listing: &str) -> Self {
        let home = tempfile::tempdir().expect("Failed to create temp home");
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create listing");
        file.write_all(listing.as_bytes()).expect("Failed to write listing");
        Self {
            home,
            listing: file,
        }
    }

    /// Command isolated from the user's config, token and terminal colors
    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ec2-reserved"));
        cmd.env("HOME", self.home.path())
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .env_remove("GOOGLE_CALENDAR_TOKEN")
            .env_remove("EC2_RESERVED_GOOGLE_ACCESS_TOKEN")
            .env_remove("RUST_LOG")
            .arg("--input")
            .arg(self.listing.path());
        cmd
    }
}

fn run(cmd: &mut Command) -> (Output, String, String) {
    let output = cmd.output().expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output, stdout, stderr)
}

fn line_with<'a>(text: &'a str, needle: &str) -> &'a str {
    text.lines()
        .find(|l| l.contains(needle))
        .unwrap_or_else(|| panic!("no line containing {:?} in:\n{}", needle, text))
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let (output, stdout, _) = run(Command::new(env!("CARGO_BIN_EXE_ec2-reserved")).arg("--help"));

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Show reserved EC2 instances"));
    assert!(stdout.contains("--state"), "Should show state option");
    assert!(stdout.contains("--type"), "Should show type option");
    assert!(
        stdout.contains("--create-google-calendar-events"),
        "Should show calendar option"
    );
    assert!(stdout.contains("payment-pending"), "Should list states");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let (output, stdout, _) =
        run(Command::new(env!("CARGO_BIN_EXE_ec2-reserved")).arg("--version"));

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("ec2-reserved"), "Should show binary name");
}

/// Test invalid state value error handling
#[test]
fn test_invalid_state() {
    let (output, _, stderr) = run(Command::new(env!("CARGO_BIN_EXE_ec2-reserved"))
        .args(["--state", "expired"]));

    assert!(!output.status.success(), "Invalid state should fail");
    assert!(stderr.contains("invalid value"), "Should explain the error");
}

/// Test listing and normalized summary
#[test]
fn test_table_report() {
    let fixture = Fixture::new(LISTING);
    let (output, stdout, stderr) = run(&mut fixture.command());

    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stdout.contains("ri-future-1"));
    assert!(stdout.contains("ri-expired"), "Retired reservations are still listed");
    assert!(line_with(&stdout, " large: ").contains("4 x 2 = 8"));
    assert!(line_with(&stdout, "2xlarge: ").contains("16 x 1 = 16"));
    assert!(line_with(&stdout, "Total (normalized):").contains("24"));
    assert!(line_with(&stdout, "Zonal total").contains('0'));
}

/// Test JSON output shape
#[test]
fn test_json_report() {
    let fixture = Fixture::new(LISTING);
    let (output, stdout, stderr) = run(fixture.command().args(["--format", "json"]));

    assert!(output.status.success(), "stderr: {}", stderr);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");

    assert_eq!(json["reservations"].as_array().unwrap().len(), 3);
    assert_eq!(json["reservations"][0]["ReservedInstancesId"], "ri-future-1");
    assert_eq!(json["reservations"][2]["Lifecycle"], "retired");
    assert_eq!(json["totals"]["region"]["m5"]["large"], 8.0);
    assert_eq!(json["totals"]["region"]["m5"]["2xlarge"], 16.0);
    assert!(json.get("calendar_sync").is_none());
}

/// Test instance type filter on a saved listing
#[test]
fn test_type_filter() {
    let fixture = Fixture::new(LISTING);
    let (output, stdout, _) = run(fixture.command().args(["--type", "2xlarge", "-f", "json"]));

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let reservations = json["reservations"].as_array().unwrap();
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0]["ReservedInstancesId"], "ri-future-2");
}

/// Test that a malformed instance type aborts without totals
#[test]
fn test_malformed_instance_type() {
    let fixture = Fixture::new(&LISTING.replace("\"m5.2xlarge\"", "\"m52xlarge\""));
    let (output, stdout, stderr) = run(&mut fixture.command());

    assert!(!output.status.success(), "Malformed type should fail");
    assert!(stderr.contains("malformed instance type 'm52xlarge'"));
    assert!(!stdout.contains("Total (normalized)"));
}

/// Test that calendar sync requires a token
#[test]
fn test_calendar_requires_token() {
    let fixture = Fixture::new(LISTING);
    let (output, _, stderr) = run(fixture.command().arg("--create-google-calendar-events"));

    assert!(!output.status.success());
    assert!(stderr.contains("access token"));
}

/// Test calendar sync creates only missing events
#[test]
fn test_calendar_sync_skips_existing_events() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/users/me/calendarList")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"items":[{"id":"cal-aws","summary":"aws"}]}"#)
        .create();
    server
        .mock("GET", "/calendars/cal-aws/events")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"items":[{{"id":"{RI_FUTURE_1_EVENT_ID}"}}]}}"#))
        .create();
    let insert = server
        .mock("POST", "/calendars/cal-aws/events")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "id": RI_FUTURE_2_EVENT_ID
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"id":"{RI_FUTURE_2_EVENT_ID}","htmlLink":"https://calendar.example/e2"}}"#
        ))
        .expect(1)
        .create();

    let fixture = Fixture::new(LISTING);
    let (output, stdout, stderr) = run(fixture
        .command()
        .env("EC2_RESERVED_GOOGLE_API_URL", server.url())
        // Manual filters are ignored in calendar mode
        .args(["--state", "retired", "--type", "c5"])
        .args(["--create-google-calendar-events", "--google-token", "t"]));

    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stdout.contains(&format!(
        "The event: {} is already scheduled",
        RI_FUTURE_1_EVENT_ID
    )));
    assert!(stdout.contains("Event created: https://calendar.example/e2"));
    assert!(!stdout.contains("ri-expired"));
    insert.assert();
}

/// Test that an unavailable listing creates nothing
#[test]
fn test_calendar_sync_fails_closed() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/users/me/calendarList")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"items":[{"id":"cal-aws","summary":"aws"}]}"#)
        .create();
    server
        .mock("GET", "/calendars/cal-aws/events")
        .match_query(mockito::Matcher::Any)
        .with_status(503)
        .create();
    let insert = server
        .mock("POST", "/calendars/cal-aws/events")
        .expect(0)
        .create();

    let fixture = Fixture::new(LISTING);
    let (output, _, stderr) = run(fixture
        .command()
        .env("EC2_RESERVED_GOOGLE_API_URL", server.url())
        .args(["--create-google-calendar-events", "--google-token", "t"]));

    assert!(!output.status.success());
    assert!(stderr.contains("could not list existing events"));
    insert.assert();
}
