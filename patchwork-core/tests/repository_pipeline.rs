use patchwork_core::aligner::{AlignerFactory, AlignerSettings, AlignmentMethod, CommandOutcome, CommandRunner, Invocation};
use patchwork_core::redirect::directed_position;
use patchwork_core::{AlignmentRepository, InputData, PairKey, RepositoryConfig, Sequence, Strand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Writes canned aligner output keyed by output file name and records calls.
#[derive(Default)]
struct FixtureRunner {
    fixtures: HashMap<String, String>,
    calls: Mutex<Vec<Invocation>>,
}

impl FixtureRunner {
    fn with(mut self, file_name: &str, lines: &[&str]) -> Self {
        let mut content = lines.join("\n");
        content.push('\n');
        self.fixtures.insert(file_name.to_string(), content);
        self
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn called_outputs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|inv| inv.output.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }
}

impl CommandRunner for FixtureRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutcome> {
        self.calls.lock().unwrap().push(invocation.clone());
        let name = invocation.output.file_name().unwrap().to_string_lossy().into_owned();
        // Unknown pairs produce an empty file, like an aligner finding nothing.
        let content = self.fixtures.get(&name).cloned().unwrap_or_default();
        std::fs::write(&invocation.output, content)?;
        Ok(CommandOutcome::succeeded())
    }
}

/// Runner whose binary never starts.
struct BrokenRunner;

impl CommandRunner for BrokenRunner {
    fn run(&self, _invocation: &Invocation) -> std::io::Result<CommandOutcome> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such binary"))
    }
}

fn minimap2_settings() -> AlignerSettings {
    AlignerSettings {
        minimap2_binary: Some(PathBuf::from("minimap2")),
        ..AlignerSettings::with_method(AlignmentMethod::Minimap2)
    }
}

fn two_sequences() -> InputData {
    InputData::from_sequences(vec![
        Sequence::new("s0", "s0.fa", 100),
        Sequence::new("s1", "s1.fa", 200),
    ])
    .unwrap()
}

fn config(dir: &Path, min_alignment_length: u64) -> RepositoryConfig {
    RepositoryConfig {
        min_alignment_length,
        alignment_dir: dir.join("pairwise_alignments"),
        verbose: false,
    }
}

fn build(input: InputData, runner: Arc<FixtureRunner>, config: &RepositoryConfig) -> AlignmentRepository {
    let aligner = AlignerFactory::with_runner(&minimap2_settings(), runner);
    AlignmentRepository::build(input, aligner.as_ref(), config).unwrap()
}

// target = sequence 0 (10..20), query = sequence 1 (50..80)
const SHORT_FORWARD: &str = "s1\t200\t50\t80\t+\ts0\t100\t10\t20\t9\t30\t60";

#[test]
fn short_record_kept_at_low_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(FixtureRunner::default().with("pair_0-s0_1-s1.tsv", &[SHORT_FORWARD]));
    let repo = build(two_sequences(), runner, &config(dir.path(), 5));

    let records = repo.alignments(0, 1).unwrap();
    assert_eq!(records.len(), 1);
    let record = records[0].record();
    assert_eq!((record.start1, record.end1), (10, 20));
    assert_eq!((record.start2, record.end2), (50, 80));
    assert_eq!((record.length1(), record.length2()), (10, 30));
    assert_eq!(records[0].segment(), ((9, 49), (19, 79)));
}

#[test]
fn short_record_dropped_at_high_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(FixtureRunner::default().with("pair_0-s0_1-s1.tsv", &[SHORT_FORWARD]));
    let repo = build(two_sequences(), runner, &config(dir.path(), 50));

    assert!(repo.alignments(0, 1).unwrap().is_empty());
    assert_eq!(repo.strand(1), Some(Strand::Forward));
}

#[test]
fn reverse_evidence_flips_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(FixtureRunner::default().with(
        "pair_0-s0_1-s1.tsv",
        &[
            "s1\t200\t10\t40\t-\ts0\t100\t0\t30\t27\t30\t60",
            "s1\t200\t100\t120\t-\ts0\t100\t50\t70\t18\t20\t60",
        ],
    ));
    let repo = build(two_sequences(), runner, &config(dir.path(), 5));

    assert_eq!(repo.strand(0), Some(Strand::Forward));
    assert_eq!(repo.strand(1), Some(Strand::Reverse));

    // query strand "-" swaps the endpoints, so raw position 10 ends the segment
    let first = &repo.alignments(0, 1).unwrap()[0];
    assert_eq!(first.end2_dir(), 190);
    assert_eq!(first.start2_dir(), 160);
    assert_eq!(directed_position(10, 200, Strand::Reverse), 190);
}

#[test]
fn self_pair_on_reverse_sequence_reflects_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(
        FixtureRunner::default()
            .with(
                "pair_0-s0_1-s1.tsv",
                &["s1\t200\t10\t40\t-\ts0\t100\t0\t30\t27\t30\t60"],
            )
            .with(
                "self_1-s1.tsv",
                &[
                    "s1\t200\t10\t40\t+\ts1\t200\t50\t80\t30\t30\t60",
                    "s1\t200\t120\t160\t-\ts1\t200\t20\t60\t36\t40\t60",
                ],
            ),
    );
    let repo = build(two_sequences(), runner, &config(dir.path(), 5));
    assert_eq!(repo.strand(1), Some(Strand::Reverse));

    let records = repo.alignments(1, 1).unwrap();
    assert_eq!(records.len(), 2);

    // both sides share the length 200 frame: v maps to 200 - v
    let forward = &records[0];
    assert_eq!((forward.record().start1, forward.record().end1), (50, 80));
    assert_eq!(forward.start1_dir(), 200 - 50);
    assert_eq!(forward.end1_dir(), 200 - 80);
    assert_eq!(forward.start2_dir(), 200 - 10);
    assert_eq!(forward.end2_dir(), 200 - 40);

    // a reverse query swaps its endpoints before reflection
    let reverse = &records[1];
    assert_eq!(reverse.start1_dir(), 200 - 20);
    assert_eq!(reverse.end1_dir(), 200 - 60);
    assert_eq!(reverse.start2_dir(), 200 - 160);
    assert_eq!(reverse.end2_dir(), 200 - 120);
}

#[test]
fn strand_override_beats_evidence() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputData::from_sequences(vec![
        Sequence::new("s0", "s0.fa", 100),
        Sequence::new("s1", "s1.fa", 200).with_strand(Strand::Forward),
    ])
    .unwrap();
    let runner = Arc::new(FixtureRunner::default().with(
        "pair_0-s0_1-s1.tsv",
        &["s1\t200\t10\t40\t-\ts0\t100\t0\t30\t27\t30\t60"],
    ));
    let repo = build(input, runner, &config(dir.path(), 5));

    assert_eq!(repo.strand(1), Some(Strand::Forward));
}

#[test]
fn stats_export_skips_self_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(
        FixtureRunner::default()
            .with(
                "self_0-s0.tsv",
                &[
                    "s0\t100\t0\t100\t+\ts0\t100\t0\t100\t100\t100\t60",
                    "s0\t100\t10\t60\t-\ts0\t100\t40\t90\t50\t50\t60",
                ],
            )
            .with(
                "pair_0-s0_1-s1.tsv",
                &[
                    "s1\t200\t0\t50\t+\ts0\t100\t0\t50\t45\t50\t60",
                    "s1\t200\t60\t90\t+\ts0\t100\t60\t90\t30\t30\t60",
                    "s1\t200\t100\t150\t+\ts0\t100\t40\t90\t40\t50\t60",
                ],
            ),
    );
    let input = InputData::from_sequences(vec![
        Sequence::new("s0", "s0.fa", 100).with_label("Locus 0"),
        Sequence::new("s1", "s1.fa", 200),
    ])
    .unwrap();
    let repo = build(input, runner, &config(dir.path(), 0));

    let stats_path = dir.path().join("alignment_stats.csv");
    let rows = repo.report_summary_alignment_stats(&stats_path).unwrap();
    assert_eq!(rows, 3);

    let text = std::fs::read_to_string(&stats_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Label1,Idx1,Label2,Idx2,PI");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "Locus 0,0,s1,1,90.0");
    assert_eq!(lines[2], "Locus 0,0,s1,1,100.0");
    assert_eq!(lines[3], "Locus 0,0,s1,1,80.0");
}

#[test]
fn empty_stats_table_keeps_header() {
    let dir = tempfile::tempdir().unwrap();
    let repo = build(two_sequences(), Arc::new(FixtureRunner::default()), &config(dir.path(), 0));

    let mut buffer = Vec::new();
    assert_eq!(repo.write_summary_alignment_stats(&mut buffer).unwrap(), 0);
    assert_eq!(String::from_utf8(buffer).unwrap().trim(), "Label1,Idx1,Label2,Idx2,PI");
}

#[test]
fn every_pair_is_aligned_once_in_matrix_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputData::from_sequences(vec![
        Sequence::new("a", "a.fa", 100),
        Sequence::new("b", "b.fa", 100),
        Sequence::new("c", "c.fa", 100),
    ])
    .unwrap();
    let runner = Arc::new(FixtureRunner::default());
    let repo = build(input, runner.clone(), &config(dir.path(), 0));

    assert_eq!(
        runner.called_outputs(),
        vec![
            "self_0-a.tsv",
            "pair_0-a_1-b.tsv",
            "pair_0-a_2-c.tsv",
            "self_1-b.tsv",
            "pair_1-b_2-c.tsv",
            "self_2-c.tsv",
        ]
    );

    let keys: Vec<PairKey> = repo.pair_keys().collect();
    assert_eq!(keys.len(), 6);
    for idx in 0..3 {
        assert!(keys.contains(&PairKey::new(idx, idx)));
        assert!(repo.alignment_file(idx, idx).unwrap().exists());
    }
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    assert!(repo.alignments(1, 0).is_none());
    assert!(repo.alignment_file(0, 1).is_some());
    assert!(repo.alignment_file(1, 0).is_none());
}

#[test]
fn existing_outputs_are_reused() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 5);

    let first = Arc::new(FixtureRunner::default().with("pair_0-s0_1-s1.tsv", &[SHORT_FORWARD]));
    build(two_sequences(), first.clone(), &config);
    assert_eq!(first.call_count(), 3);

    let second = Arc::new(FixtureRunner::default());
    let repo = build(two_sequences(), second.clone(), &config);
    assert_eq!(second.call_count(), 0);
    assert_eq!(repo.alignments(0, 1).unwrap().len(), 1);
}

#[test]
fn failing_aligner_yields_empty_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let aligner = AlignerFactory::with_runner(&minimap2_settings(), Arc::new(BrokenRunner));
    let repo = AlignmentRepository::build(two_sequences(), aligner.as_ref(), &config(dir.path(), 0)).unwrap();

    assert_eq!(repo.pair_keys().count(), 3);
    assert!(repo.alignments(0, 1).unwrap().is_empty());
    assert_eq!(repo.strands(), &[Strand::Forward, Strand::Forward]);
}

#[test]
fn summary_reports_counts_and_identity() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(FixtureRunner::default().with(
        "pair_0-s0_1-s1.tsv",
        &[
            "s1\t200\t0\t50\t+\ts0\t100\t0\t50\t45\t50\t60",
            "s1\t200\t60\t90\t+\ts0\t100\t60\t90\t30\t30\t60",
        ],
    ));
    let repo = build(two_sequences(), runner, &config(dir.path(), 0));

    let summary = repo.summary(PairKey::new(0, 1)).unwrap();
    assert_eq!(summary.records, 2);
    assert_eq!(summary.aligned_bases, 80);
    assert!((summary.mean_identity - 95.0).abs() < 1e-9);
    assert_eq!(repo.label(1), Some("s1"));
    assert_eq!(repo.length(1), Some(200));
}
