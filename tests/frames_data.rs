use std::fs;
use std::path::Path;
use rand::{thread_rng, Rng};

use frame_sync::Float;
use frame_sync::alignment::{align_topics, add_topic_data, TopicOutcome, TopicSource};
use frame_sync::interpolation::{interpolate, InterpolationError, InterpolationMethod};
use frame_sync::io::{frame_loader::load_frames, table_writer::write_table, topic_loader};
use frame_sync::runtime_conf::RuntimeConf;
use frame_sync::sensors::{FieldMap, FieldValue, frame::Frame, topic_sample::{TopicSample, TopicSamples}};

const FRAMES: &str = "1000,0000.png
1500,0001.png
2000,0002.png
2500,0003.png
";

const LOCAL_POSE: &str = "LocalPoseTopic
topic:
  timeNS: 1200000
  pos: {x: 0.0, y: 0.0, z: 0.0}
  vel: {x: 1.0, y: 0.0, z: 0.0}
  att: {roll: 0.0, pitch: 0.0, yaw: 10.0}
  acc: {x: 0.0, y: 0.0, z: 9.81}
===
topic:
  timeNS: 1800000
  pos: {x: 6.0, y: 0.0, z: 0.0}
  vel: {x: 2.0, y: 0.0, z: 0.0}
  att: {roll: 0.0, pitch: 0.0, yaw: 20.0}
  acc: {x: 0.0, y: 0.0, z: 9.81}
===
";

const SENSOR_GPS: &str = "SensorGPSTopic
topic:
  timeNS: 1000000
  pos: {x: 100.0, y: 200.0, z: 10.0}
===
topic:
  timeNS: 2000000
  pos: {x: 110.0, y: 220.0, z: 30.0}
===
";

fn write_dataset(dir: &Path, gps: &str) {
    fs::write(dir.join("frames.txt"), FRAMES).unwrap();
    fs::write(dir.join("LocalPoseTopic.txt"), LOCAL_POSE).unwrap();
    fs::write(dir.join("SensorGPSTopic.txt"), gps).unwrap();
}

fn vector(components: &[(&str, Float)]) -> FieldValue {
    FieldValue::Vector(components.iter().map(|&(k, v)| (k.to_string(), v)).collect())
}

#[test]
fn default_topics_produce_frames_table() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), SENSOR_GPS);

    let runtime_conf = RuntimeConf::default();
    let mut frames = load_frames(&dir.path().join(&runtime_conf.frames_file)).unwrap();
    let outcomes = align_topics(&mut frames, &runtime_conf.topic_sources(dir.path()).unwrap()).unwrap();
    assert!(outcomes.iter().all(|o| o.is_applied()));

    // Nearest pose, held before the first and after the last sample
    assert_eq!(frames[0].fields["pos"], vector(&[("x", 0.0), ("y", 0.0), ("z", 0.0)]));
    assert_eq!(frames[1].fields["att"], vector(&[("roll", 0.0), ("pitch", 0.0), ("yaw", 10.0)]));
    assert_eq!(frames[3].fields["vel"], vector(&[("x", 2.0), ("y", 0.0), ("z", 0.0)]));
    // Linear GPS under the second source's suffix
    assert_eq!(frames[1].fields["pos1"], vector(&[("x", 105.0), ("y", 210.0), ("z", 20.0)]));
    assert_eq!(frames[3].fields["pos1"], vector(&[("x", 110.0), ("y", 220.0), ("z", 30.0)]));

    let outfile = dir.path().join(&runtime_conf.outfile);
    write_table(&frames, &outfile).unwrap();
    let table = fs::read_to_string(&outfile).unwrap();
    let lines = table.lines().collect::<Vec<&str>>();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "#ts, png, pos.x, pos.y, pos.z, vel.x, vel.y, vel.z, att.roll, att.pitch, att.yaw, pos1.x, pos1.y, pos1.z");
    assert_eq!(lines[2], "1500,0001.png,0.0,0.0,0.0,1.0,0.0,0.0,0.0,0.0,10.0,105.0,210.0,20.0");
}

#[test]
fn broken_topic_is_skipped_and_keeps_suffix_order() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "topic:\n  timeNS: 1000000\n  pos: {x: 1.0, y: \n===\n");

    let mut sources = RuntimeConf::default().topic_sources(dir.path()).unwrap();
    // Broken GPS first, then the pose log: the pose log is the first applied source
    sources.reverse();
    let mut frames = load_frames(&dir.path().join("frames.txt")).unwrap();
    let outcomes = align_topics(&mut frames, &sources).unwrap();

    assert!(matches!(outcomes[0], TopicOutcome::DecodeFailed(_)));
    assert!(outcomes[1].is_applied());
    assert!(frames.iter().all(|f| f.fields.contains_key("pos") && !f.fields.contains_key("pos1")));
}

#[test]
fn empty_topic_leaves_frames_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "SensorGPSTopic\n");

    let mut frames = load_frames(&dir.path().join("frames.txt")).unwrap();
    let before = frames.clone();
    let sources = RuntimeConf::default().topic_sources(dir.path()).unwrap();
    let outcome = add_topic_data(&mut frames, &sources[1], 0).unwrap();

    assert!(matches!(outcome, TopicOutcome::Empty));
    assert_eq!(frames, before);
}

#[test]
fn same_key_from_two_sources_is_suffixed() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), SENSOR_GPS);
    let source = |file: &str, method| TopicSource {
        file: dir.path().join(file),
        time_key: "timeNS".to_string(),
        keys: vec!["pos".to_string()],
        method,
        extrapolate: true
    };

    let mut frames = load_frames(&dir.path().join("frames.txt")).unwrap();
    align_topics(&mut frames, &[
        source("SensorGPSTopic.txt", InterpolationMethod::Linear),
        source("LocalPoseTopic.txt", InterpolationMethod::Nearest),
        source("SensorGPSTopic.txt", InterpolationMethod::Nearest)
    ]).unwrap();

    for frame in &frames {
        assert_eq!(frame.fields.keys().collect::<Vec<&String>>(), vec!["pos", "pos1", "pos2"]);
    }
    assert_eq!(frames[1].fields["pos"], vector(&[("x", 105.0), ("y", 210.0), ("z", 20.0)]));
    assert_eq!(frames[1].fields["pos2"], vector(&[("x", 100.0), ("y", 200.0), ("z", 10.0)]));
}

#[test]
fn topic_table_starts_with_time_key() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), SENSOR_GPS);

    let keys = vec!["acc".to_string()];
    let topic = topic_loader::load(&dir.path().join("LocalPoseTopic.txt"), "timeNS", &keys).unwrap();
    let outfile = dir.path().join("LocalPoseTopic.csv");
    write_table(&topic.rows(), &outfile).unwrap();

    let table = fs::read_to_string(&outfile).unwrap();
    assert_eq!(table, "#timeNS, acc.x, acc.y, acc.z\n1200000,0.0,0.0,9.81\n1800000,0.0,0.0,9.81\n");
}

#[test]
fn topic_table_leaves_absent_keys_empty() {
    let dir = tempfile::tempdir().unwrap();
    let infile = dir.path().join("ImuTopic.txt");
    fs::write(&infile, "ImuTopic\ntopic:\n  timeNS: 1000\n  acc: 1.0\n===\ntopic:\n  timeNS: 2000\n===\ntopic:\n  timeNS: 3000\n  acc: 2.5\n===\n").unwrap();

    let keys = vec!["acc".to_string()];
    let topic = topic_loader::load(&infile, "timeNS", &keys).unwrap();
    assert_eq!(topic.len(), 3);
    let outfile = dir.path().join("ImuTopic.csv");
    write_table(&topic.rows(), &outfile).unwrap();

    let table = fs::read_to_string(&outfile).unwrap();
    assert_eq!(table, "#timeNS, acc\n1000,1.0\n2000,\n3000,2.5\n");
}

#[test]
fn interpolating_a_key_absent_from_some_samples_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "topic:\n  timeNS: 1000000\n  pos: {x: 1.0}\n===\ntopic:\n  timeNS: 2000000\n===\n");

    let sources = RuntimeConf::default().topic_sources(dir.path()).unwrap();
    let mut frames = load_frames(&dir.path().join("frames.txt")).unwrap();
    let result = add_topic_data(&mut frames, &sources[1], 0);

    assert_eq!(result.err(), Some(InterpolationError::IncompleteField { key: "pos".to_string(), sample: 1 }));
    assert!(frames.iter().all(|f| f.fields.is_empty()));
}

fn random_topic(rng: &mut impl Rng, count: usize) -> TopicSamples {
    let mut ts_ns = rng.gen_range(0..1_000_000i64);
    let samples = (0..count).map(|_| {
        ts_ns += rng.gen_range(1..50_000i64);
        let mut fields = FieldMap::new();
        fields.insert("alt".to_string(), FieldValue::Scalar(rng.gen_range(-100.0..100.0)));
        fields.insert("pos".to_string(), vector(&[("x", rng.gen_range(-1.0..1.0)), ("y", rng.gen_range(-1.0..1.0))]));
        TopicSample::new(ts_ns, fields)
    }).collect();
    TopicSamples::new("timeNS", &["alt".to_string(), "pos".to_string()], samples).unwrap()
}

fn random_frames(rng: &mut impl Rng, count: usize) -> Vec<Frame> {
    let mut ts_us = 0i64;
    (0..count).map(|i| {
        ts_us += rng.gen_range(1..2_000i64);
        Frame::new(ts_us, &format!("{:04}.png", i))
    }).collect()
}

fn scalar(value: &FieldValue) -> Float {
    match value {
        FieldValue::Scalar(v) => *v,
        other => panic!("expected scalar, got {:?}", other)
    }
}

#[test]
fn random_nearest_only_picks_sample_values() {
    let mut rng = thread_rng();
    for _ in 0..20 {
        let (sample_count, frame_count) = (rng.gen_range(2..60), rng.gen_range(1..80));
        let topic = random_topic(&mut rng, sample_count);
        let mut frames = random_frames(&mut rng, frame_count);
        let timestamps = frames.iter().map(|f| f.timestamp).collect::<Vec<i64>>();
        let keys = vec!["alt".to_string(), "pos".to_string()];

        interpolate(&mut frames, &topic, &keys, "", InterpolationMethod::Nearest, true).unwrap();

        assert_eq!(frames.iter().map(|f| f.timestamp).collect::<Vec<i64>>(), timestamps);
        for frame in &frames {
            let alt = &frame.fields["alt"];
            let pos = &frame.fields["pos"];
            assert!(topic.samples().iter().any(|s| s.field("alt") == Some(alt) && s.field("pos") == Some(pos)));
        }
    }
}

#[test]
fn random_linear_stays_between_bracketing_samples() {
    let mut rng = thread_rng();
    for _ in 0..20 {
        let (sample_count, frame_count) = (rng.gen_range(2..60), rng.gen_range(1..80));
        let topic = random_topic(&mut rng, sample_count);
        let mut frames = random_frames(&mut rng, frame_count);
        let keys = vec!["alt".to_string()];

        interpolate(&mut frames, &topic, &keys, "", InterpolationMethod::Linear, false).unwrap();

        let samples = topic.samples();
        let first_us = samples[0].timestamp_us();
        let last_us = samples[samples.len()-1].timestamp_us();
        for frame in &frames {
            let t = frame.timestamp_us();
            if t < first_us || t >= last_us {
                assert!(frame.fields.is_empty());
                continue;
            }
            let cur = samples.iter().position(|s| s.timestamp_us() > t).unwrap();
            let a = scalar(samples[cur-1].field("alt").unwrap());
            let b = scalar(samples[cur].field("alt").unwrap());
            let v = scalar(&frame.fields["alt"]);
            assert!(v >= a.min(b) - 1e-9 && v <= a.max(b) + 1e-9);
        }
    }
}
