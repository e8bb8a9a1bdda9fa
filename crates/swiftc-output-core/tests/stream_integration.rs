#![allow(clippy::unwrap_used, clippy::panic)] // Integration tests use unwrap for brevity

//! Integration tests for the streaming parser.
//!
//! Feeds realistic compiler output through `OutputParser` split in many
//! different ways and checks the delivered records.

use swiftc_output_core::message::{BeganInfo, MessageKind, OutputRef};
use swiftc_output_core::parser::{FnSink, OutputParser, ParseEvent, ParseEvents, ParserStatus};
use swiftc_output_core::{CompilerMessage, ParseError, ParserConfig};

const BEGAN: &str = r#"{"kind":"began","name":"compile","pid":22698,"inputs":["main.swift"],"outputs":[{"type":"object","path":"/var/folders/main.o"}],"command_executable":"swift","command_arguments":["-frontend","-c","-primary-file","main.swift"]}"#;
const SKIPPED: &str = r#"{"kind":"skipped","name":"compile","inputs":["util.swift"],"outputs":[{"type":"object","path":"/var/folders/util.o"}]}"#;
const FINISHED: &str = r#"{"kind":"finished","name":"compile","pid":22698,"output":"warning: unused variable\n"}"#;
const SIGNALLED: &str = r#"{"kind":"signalled","name":"compile","pid":22698,"output":"Segmentation fault: 11"}"#;

fn frame(json: &str) -> Vec<u8> {
    format!("{}\n{}\n", json.len(), json).into_bytes()
}

fn stream(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

/// Comparable view of parser output.
fn outcomes(events: &[ParseEvent]) -> Vec<Result<CompilerMessage, String>> {
    events
        .iter()
        .map(|e| match e {
            ParseEvent::Message(msg) => Ok(msg.clone()),
            ParseEvent::Failed(err) => Err(err.to_string()),
        })
        .collect()
}

fn feed_chunks(bytes: &[u8], chunk_sizes: impl IntoIterator<Item = usize>) -> ParseEvents {
    let mut parser = OutputParser::new("App");
    let mut sink = ParseEvents::new();
    let mut offset = 0;
    for size in chunk_sizes {
        let end = (offset + size).min(bytes.len());
        parser.feed(&bytes[offset..end], &mut sink);
        offset = end;
    }
    parser.feed(&bytes[offset..], &mut sink);
    sink
}

fn feed_whole(bytes: &[u8]) -> ParseEvents {
    feed_chunks(bytes, [bytes.len()])
}

fn sample_stream() -> Vec<u8> {
    stream(&[
        &frame(BEGAN),
        b"remark: SWIFTC_MAXIMUM_DETERMINISM is set\n",
        &frame(SKIPPED),
        &frame(FINISHED),
    ])
}

#[test]
fn whole_stream_decodes_in_order() {
    let sink = feed_whole(&sample_stream());
    let kinds: Vec<_> = sink.messages().map(|m| m.kind.label()).collect();
    assert_eq!(kinds, ["began", "unparsable_output", "skipped", "finished"]);
    assert_eq!(sink.failure_count(), 0);
}

#[test]
fn one_byte_chunks_match_whole_stream() {
    let bytes = sample_stream();
    let expected = outcomes(feed_whole(&bytes).events());
    let actual = outcomes(feed_chunks(&bytes, std::iter::repeat_n(1, bytes.len())).events());
    assert_eq!(actual, expected);
}

#[test]
fn every_two_way_split_matches_whole_stream() {
    let bytes = sample_stream();
    let expected = outcomes(feed_whole(&bytes).events());
    for split in 0..=bytes.len() {
        let actual = outcomes(feed_chunks(&bytes, [split]).events());
        assert_eq!(actual, expected, "split at {split}");
    }
}

#[test]
fn irregular_chunk_sizes_match_whole_stream() {
    let bytes = sample_stream();
    let expected = outcomes(feed_whole(&bytes).events());
    for pattern in [[2, 3, 5, 7], [1, 40, 1, 13], [11, 1, 1, 97], [64, 64, 64, 64]] {
        let sizes = pattern.iter().copied().cycle().take(bytes.len());
        let actual = outcomes(feed_chunks(&bytes, sizes).events());
        assert_eq!(actual, expected, "pattern {pattern:?}");
    }
}

#[test]
fn failure_is_chunking_transparent() {
    let bytes = stream(&[&frame(BEGAN), b"2\n{}\n", &frame(FINISHED)]);
    let expected = outcomes(feed_whole(&bytes).events());
    assert_eq!(expected.len(), 2);
    assert!(expected[1].is_err());

    let actual = outcomes(feed_chunks(&bytes, std::iter::repeat_n(1, bytes.len())).events());
    assert_eq!(actual, expected);
}

#[test]
fn began_fields_are_mapped_verbatim() {
    let sink = feed_whole(&frame(BEGAN));
    let msg = sink.messages().next().unwrap();
    assert_eq!(msg.name, "compile");
    assert_eq!(
        msg.kind,
        MessageKind::Began(BeganInfo {
            pid: 22698,
            inputs: vec!["main.swift".into()],
            outputs: vec![OutputRef {
                output_type: "object".into(),
                path: "/var/folders/main.o".into(),
            }],
            command_executable: "swift".into(),
            command_arguments: vec![
                "-frontend".into(),
                "-c".into(),
                "-primary-file".into(),
                "main.swift".into(),
            ],
        })
    );
}

#[test]
fn signalled_record_stops_the_stream() {
    let bytes = stream(&[&frame(BEGAN), &frame(SIGNALLED), &frame(FINISHED)]);
    let mut parser = OutputParser::new("App");
    let mut sink = ParseEvents::new();
    parser.feed(&bytes, &mut sink);

    let kinds: Vec<_> = sink.messages().map(|m| m.kind.label()).collect();
    assert_eq!(kinds, ["began", "signalled"]);
    assert_eq!(sink.failure_count(), 0);
    assert_eq!(parser.status(), ParserStatus::Signalled);

    parser.feed(&frame(FINISHED), &mut sink);
    assert_eq!(sink.len(), 2);
}

#[test]
fn bogus_kind_reports_once_then_ignores_input() {
    let bogus = r#"{"kind":"bogus","name":"compile"}"#;
    let mut parser = OutputParser::new("App");
    let mut sink = ParseEvents::new();

    parser.feed(&frame(bogus), &mut sink);
    parser.feed(&frame(FINISHED), &mut sink);
    parser.feed(&frame(BEGAN), &mut sink);

    assert_eq!(sink.len(), 1);
    assert_eq!(sink.failure_count(), 1);
    assert_eq!(parser.status(), ParserStatus::Failed);
}

#[test]
fn empty_object_is_missing_structure() {
    let sink = feed_whole(b"2\n{}\n");
    assert_eq!(sink.messages().count(), 0);
    let [ParseEvent::Failed(ParseError::InvalidMessage(err))] = sink.events() else {
        panic!("expected a single InvalidMessage failure");
    };
    assert!(err.to_string().contains("missing field"));
}

#[test]
fn non_json_body_is_decode_error() {
    let body = "not valid json!!!";
    assert_eq!(body.len(), 17);
    let mut parser = OutputParser::new("App");
    let mut sink = ParseEvents::new();
    parser.feed(format!("17\n{body}\n").as_bytes(), &mut sink);

    assert!(matches!(
        sink.events(),
        [ParseEvent::Failed(ParseError::InvalidMessage(_))]
    ));
    assert!(parser.is_latched());
}

#[test]
fn unparsable_lines_do_not_consume_a_frame() {
    let bytes = stream(&[b"hello\n", b"\n", &frame(FINISHED)]);
    let sink = feed_whole(&bytes);
    let messages: Vec<_> = sink.messages().cloned().collect();
    assert_eq!(
        messages[..2],
        [
            CompilerMessage::unparsable("hello"),
            CompilerMessage::unparsable(""),
        ]
    );
    assert_eq!(messages[2].kind.label(), "finished");
}

#[test]
fn closure_sink_receives_records() {
    let mut names = Vec::new();
    let mut failures = Vec::new();
    let mut parser = OutputParser::new("App");
    {
        let mut sink = FnSink::new(
            |m: CompilerMessage| names.push(m.kind.label()),
            |e: ParseError| failures.push(e.to_string()),
        );
        parser.feed(&sample_stream(), &mut sink);
    }
    assert_eq!(names.len(), 4);
    assert!(failures.is_empty());
}

#[test]
fn unterminated_line_fails_once_regardless_of_chunking() {
    let config = ParserConfig {
        max_line_size: 32,
        ..ParserConfig::default()
    };
    let mut bytes = frame(FINISHED);
    bytes.extend(std::iter::repeat_n(b'x', 100));

    let run = |chunk: usize| {
        let mut parser = OutputParser::with_config("App", config);
        let mut sink = ParseEvents::new();
        for piece in bytes.chunks(chunk) {
            parser.feed(piece, &mut sink);
        }
        assert_eq!(parser.status(), ParserStatus::Failed);
        assert_eq!(parser.buffered_len(), 0);
        sink
    };

    let whole = run(bytes.len());
    let single = run(1);
    assert_eq!(outcomes(single.events()), outcomes(whole.events()));
    assert_eq!(whole.messages().count(), 1);
    assert_eq!(whole.failure_count(), 1);
    assert!(matches!(
        whole.events().last(),
        Some(ParseEvent::Failed(ParseError::LineTooLong { max: 32 }))
    ));
}
