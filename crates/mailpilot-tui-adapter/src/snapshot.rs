use crate::render::RenderFrame;

/// Assert a stable text snapshot for a render frame.
///
/// Trailing whitespace on each row and trailing blank rows are ignored, so
/// fixtures do not need to pad lines to the frame size.
pub fn assert_render_frame_snapshot(label: &str, frame: &RenderFrame, expected: &str) {
    let expected = normalize(expected);
    let got = normalize(&frame.snapshot());
    assert_eq!(
        got, expected,
        "render frame snapshot mismatch ({label})\n--- expected\n{expected}\n--- got\n{got}",
    );
}

/// Returns true when any row of `frame` contains `needle`.
#[must_use]
pub fn frame_contains(frame: &RenderFrame, needle: &str) -> bool {
    (0..frame.size().height).any(|row| frame.row_text(row).contains(needle))
}

fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end_matches('\n')
        .to_owned()
}
