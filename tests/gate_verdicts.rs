// tests/gate_verdicts.rs

use std::sync::Arc;

use testdag::gate::{GateOptions, REASON_RACE, REASON_SKIPPED, REASON_UNKNOWN, Verdict, evaluate_gate};
use testdag::job::{Job, JobSet};
use testdag::types::{Bucket, RunOutcome};
use testdag_test_utils::builders::{JobBuilder, ManifestBuilder};
use testdag_test_utils::init_tracing;

fn siblings(jobs: &JobSet) -> Vec<Arc<Job>> {
    jobs.to_vec()
}

#[test]
fn unknown_prerequisite_fails_the_job() {
    init_tracing();
    let jobs = ManifestBuilder::new()
        .with_job("x", JobBuilder::new().prereq("ghost").build())
        .with_job("y", JobBuilder::new().build())
        .build_jobs();
    let all = siblings(&jobs);
    let x = jobs.get("x").unwrap();

    let verdict = evaluate_gate(x, &all, &GateOptions::default());

    assert_eq!(
        verdict,
        Verdict::Blocked {
            bucket: Bucket::Fail,
            reason: REASON_UNKNOWN.to_string()
        }
    );
    assert_eq!(x.bucket(), Bucket::Fail);
    assert!(x.status().message().contains("unknown dependency"));
    // The sibling is untouched.
    assert!(jobs.get("y").unwrap().status().is_pending());
}

#[test]
fn same_tier_outputs_race_for_either_job() {
    init_tracing();
    for name in ["a", "b"] {
        let jobs = ManifestBuilder::new()
            .with_job("a", JobBuilder::new().output("out.e").build())
            .with_job("b", JobBuilder::new().output("out.e").build())
            .build_jobs();
        let all = siblings(&jobs);
        let job = jobs.get(name).unwrap();

        let verdict = evaluate_gate(job, &all, &GateOptions::default());
        assert_eq!(
            verdict,
            Verdict::Blocked {
                bucket: Bucket::Fail,
                reason: REASON_RACE.to_string()
            },
            "job {name}"
        );
        assert!(job.did_fail());
    }
}

#[test]
fn dependent_sharing_an_output_is_not_a_race() {
    let jobs = ManifestBuilder::new()
        .with_job("a", JobBuilder::new().output("out.e").build())
        .with_job("b", JobBuilder::new().prereq("a").output("out.e").build())
        .build_jobs();
    let all = siblings(&jobs);

    assert_eq!(
        evaluate_gate(jobs.get("a").unwrap(), &all, &GateOptions::default()),
        Verdict::Go
    );
    assert_eq!(
        evaluate_gate(jobs.get("b").unwrap(), &all, &GateOptions::default()),
        Verdict::Wait
    );
}

#[test]
fn failed_prerequisite_skips_dependent() {
    init_tracing();
    let jobs = ManifestBuilder::new()
        .with_job("y", JobBuilder::new().status(Bucket::Fail).build())
        .with_job("x", JobBuilder::new().prereq("y").build())
        .build_jobs();
    let all = siblings(&jobs);
    let x = jobs.get("x").unwrap();

    let verdict = evaluate_gate(x, &all, &GateOptions::default());

    assert_eq!(
        verdict,
        Verdict::Blocked {
            bucket: Bucket::Skip,
            reason: REASON_SKIPPED.to_string()
        }
    );
    assert_eq!(x.bucket(), Bucket::Skip);
}

#[test]
fn pending_prerequisite_waits_then_goes() {
    let jobs = ManifestBuilder::new()
        .with_job("y", JobBuilder::new().build())
        .with_job("x", JobBuilder::new().prereq("y").build())
        .build_jobs();
    let all = siblings(&jobs);
    let x = jobs.get("x").unwrap();
    let y = jobs.get("y").unwrap();

    let before = x.status();
    assert_eq!(evaluate_gate(x, &all, &GateOptions::default()), Verdict::Wait);
    assert_eq!(x.status(), before);

    y.set_status("ok", RunOutcome::Pass.bucket());
    assert_eq!(evaluate_gate(x, &all, &GateOptions::default()), Verdict::Go);
    assert!(x.status().is_pending());
}

#[test]
fn bypass_lets_dependent_of_failed_job_go() {
    let manifest = ManifestBuilder::new()
        .ignored_caveats("prereq")
        .with_job("y", JobBuilder::new().status(Bucket::Fail).build())
        .with_job("x", JobBuilder::new().prereq("y").build())
        .build();
    let options = GateOptions::from_ignored_caveats(&manifest.options.ignored_caveats);
    let jobs = JobSet::from_manifest(&manifest);
    let all = siblings(&jobs);

    assert_eq!(evaluate_gate(jobs.get("x").unwrap(), &all, &options), Verdict::Go);
}

#[test]
fn should_not_execute_prerequisite_skips_dependent() {
    let jobs = ManifestBuilder::new()
        .with_job("y", JobBuilder::new().should_execute(false).build())
        .with_job("x", JobBuilder::new().prereq("y").build())
        .build_jobs();
    let all = siblings(&jobs);

    assert!(matches!(
        evaluate_gate(jobs.get("x").unwrap(), &all, &GateOptions::default()),
        Verdict::Blocked { bucket: Bucket::Skip, .. }
    ));
}
