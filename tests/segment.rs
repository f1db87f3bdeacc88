use relaychat::segment::{segment, segment_decoded, Segment};

fn text(s: &str) -> Segment {
    Segment::Text(s.to_string())
}

fn thinking(s: &str) -> Segment {
    Segment::Thinking(s.to_string())
}

#[test]
fn test_plain_content_is_single_text_segment() {
    let content = "Hello! How can I help?";
    assert_eq!(segment(content), vec![text(content)]);
}

#[test]
fn test_single_span_splits_into_three() {
    let segments = segment("A<think>B</think>C");
    assert_eq!(segments, vec![text("A"), thinking("B"), text("C")]);
}

#[test]
fn test_two_spans_alternate() {
    let segments = segment("A<think>B</think>C<think>D</think>E");
    assert_eq!(
        segments,
        vec![text("A"), thinking("B"), text("C"), thinking("D"), text("E")]
    );
}

#[test]
fn test_empty_text_segments_are_kept() {
    let segments = segment("<think>only thoughts</think>");
    assert_eq!(segments, vec![text(""), thinking("only thoughts"), text("")]);
}

#[test]
fn test_delimiters_are_case_insensitive() {
    let segments = segment("before<THINK>loud</Think>after");
    assert_eq!(segments, vec![text("before"), thinking("loud"), text("after")]);
}

#[test]
fn test_thinking_body_spans_lines() {
    let segments = segment("Answer:\n<think>\nstep one\nstep two\n</think>\nDone");
    assert_eq!(segments[1], thinking("\nstep one\nstep two\n"));
    assert_eq!(segments.len(), 3);
}

#[test]
fn test_spans_do_not_nest() {
    // The first closing tag ends the span.
    let segments = segment("<think>a<think>b</think>c</think>");
    assert_eq!(
        segments,
        vec![text(""), thinking("a<think>b"), text("c</think>")]
    );
}

#[test]
fn test_unclosed_span_stays_text() {
    let content = "<think>never closed";
    assert_eq!(segment(content), vec![text(content)]);
}

#[test]
fn test_escaped_delimiters_are_decoded_but_not_split() {
    let content = "\\u003Cthink\\u003Ehidden\\u003C/think\\u003EVisible";
    assert_eq!(
        segment(content),
        vec![text("<think>hidden</think>Visible")]
    );
}

#[test]
fn test_segment_decoded_splits_escaped_spans() {
    let content = "\\u003Cthink\\u003Ehidden\\u003C/think\\u003EVisible";
    assert_eq!(
        segment_decoded(content),
        vec![text(""), thinking("hidden"), text("Visible")]
    );
}

#[test]
fn test_literal_spans_win_over_escaped_ones() {
    let content = "<think>real</think>tail \\u003Cthink\\u003E";
    let segments = segment_decoded(content);
    assert_eq!(segments[1], thinking("real"));
    assert_eq!(segments[2], text("tail \\u003Cthink\\u003E"));
}

#[test]
fn test_segments_reassemble_to_source() {
    let content = "intro<think>x</think>middle<think>y</think>";
    let rebuilt: String = segment(content)
        .iter()
        .map(|s| match s {
            Segment::Text(t) => t.clone(),
            Segment::Thinking(t) => format!("<think>{}</think>", t),
        })
        .collect();
    assert_eq!(rebuilt, content);
}

#[test]
fn test_kelvin_sign_is_not_a_delimiter() {
    let content = "<thin\u{212A}>x</think>";
    assert_eq!(segment(content), vec![text(content)]);
    assert_eq!(segment("<THINK>x</THINK>")[1], thinking("x"));
}

#[test]
fn test_blank_text_segments_are_flagged() {
    let segments = segment(" <think>plan</think>answer");

    assert!(segments[0].is_blank_text());
    assert!(segments[1].is_thinking());
    assert!(!segments[1].is_blank_text());
    assert_eq!(segments[1].body(), "plan");
    assert!(!segments[2].is_blank_text());
}
