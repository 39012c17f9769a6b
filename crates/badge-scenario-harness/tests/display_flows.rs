use std::path::PathBuf;

use badge_core::framebuffer::FRAME_SIZE;
use badge_core::hal::DisplayFlags;
use badge_core::{BadgeError, Value};
use badge_scenario_harness::{save_frame_png, ScenarioHarness};

fn snapshot_path(name: &str) -> Option<PathBuf> {
    std::env::var_os("SCENARIO_CAPTURE")?;
    Some(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("target")
            .join("scenario-snapshots")
            .join(format!("{}.png", name)),
    )
}

#[test]
fn display_picture_sends_lut_flags() {
    let mut harness = ScenarioHarness::new();
    harness.run_ok("badge.eink_init()");
    assert!(harness.board().panel.initialized);

    harness.run_ok("badge.display_picture(4, -1)");
    harness.run_ok("badge.display_picture(0, 2)");

    let frames = &harness.board().panel.frames;
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].flags, DisplayFlags::DEFAULT);
    assert_eq!(frames[1].flags.lut_field(), 3);
    assert!(frames.iter().all(|f| f.image.len() == FRAME_SIZE));

    // the checkerboard picture is half black
    let black: u32 = frames[0].image.iter().map(|b| (!b).count_ones()).sum();
    assert_eq!(black, 296 * 128 / 2);

    if let Some(path) = snapshot_path("display_picture_test") {
        save_frame_png(&frames[0].image, &path).expect("failed to save picture");
    }
}

#[test]
fn display_picture_out_of_range_sends_nothing() {
    let mut harness = ScenarioHarness::new();
    for line in ["badge.display_picture(5, -1)", "badge.display_picture(-1, -1)"] {
        assert!(matches!(harness.run(line), Err(BadgeError::Value(_))));
    }
    assert!(harness.board().panel.frames.is_empty());
}

#[test]
fn ugfx_demo_pushes_the_bullseye() {
    let mut harness = ScenarioHarness::new();
    harness.run_ok("badge.ugfx_init()");
    harness.run_ok("badge.ugfx_demo('HACKING')");

    assert!(harness.is_black(60, 60));
    assert!(!harness.is_black(60, 45));
    assert!(harness.black_in(130, 20, 296, 110) > 0);
    let frame = harness.last_frame().expect("demo flushes");
    assert_eq!(frame.image.as_slice(), harness.framebuffer().buffer());

    if let Some(path) = snapshot_path("ugfx_demo") {
        harness
            .save_screenshot_png(&path)
            .expect("failed to save demo");
    }
}

#[test]
fn polygon_accepts_at_most_twenty_points() {
    let mut harness = ScenarioHarness::new();
    harness.run_ok("badge.ugfx_init()");

    // 25 single pixels spread along a row; only the first 20 are drawn
    let points: Vec<String> = (0..25).map(|i| format!("({}, 0)", i * 10)).collect();
    let line = format!("badge.polygon(5, 60, [{}], badge.BLACK)", points.join(", "));
    assert_eq!(harness.run(&line), Ok(Value::None));

    assert!(harness.is_black(5, 60));
    assert!(harness.is_black(5 + 190, 60));
    assert!(!harness.is_black(5 + 200, 60));
    assert!(!harness.is_black(5 + 240, 60));
}

#[test]
fn fill_polygon_skips_malformed_points() {
    let mut harness = ScenarioHarness::new();
    harness.run_ok("badge.ugfx_init()");
    harness.run_ok("badge.fill_polygon(10, 10, [(0, 0), 7, (40, 0), (1, 2, 3), (40, 40), (0, 40)], badge.BLACK)");

    assert!(harness.is_black(30, 30));
    assert!(!harness.is_black(60, 60));
}

#[test]
fn text_box_and_measurements() {
    let mut harness = ScenarioHarness::new();
    harness.run_ok("badge.ugfx_init()");

    let width = harness
        .run_ok("badge.get_string_width('badge', 'Roboto_Regular12')")
        .as_int()
        .expect("width");
    let char_width = harness
        .run_ok("badge.get_char_width(97, 'Roboto_Regular12')")
        .as_int()
        .expect("char width");
    assert_eq!(width, 5 * char_width);

    harness.run_ok(
        "badge.string_box(0, 0, 296, 128, 'centered', 'PermanentMarker22', badge.BLACK, badge.justifyCenter)",
    );
    assert_eq!(harness.black_in(0, 0, 60, 128), 0);
    assert!(harness.black_in(100, 40, 200, 90) > 0);
}

#[test]
fn script_reports_failing_line() {
    let mut harness = ScenarioHarness::new();
    let err = harness
        .run_script("badge.ugfx_init()\nbadge.circle(1, 2, 3)\nbadge.flush()")
        .unwrap_err();
    assert_eq!(err.0, 2);
    assert!(matches!(err.1, BadgeError::Type(_)));
    assert!(harness.last_frame().is_none());
}

#[test]
fn primitives_from_the_console() {
    let mut harness = ScenarioHarness::new();
    harness
        .run_script(
            "
            badge.ugfx_init()
            badge.pixel(10, 10, badge.BLACK)
            badge.line(0, 20, 50, 20, badge.BLACK)
            badge.thickline(10, 40, 100, 40, badge.BLACK, 5, 1)
            badge.rounded_box(150, 10, 40, 30, 5, badge.BLACK)
            badge.fill_rounded_box(200, 10, 40, 30, 5, badge.BLACK)
            badge.fill_ellipse(100, 100, 20, 10, badge.BLACK)
            badge.ellipse(250, 100, 20, 10, badge.BLACK)
            badge.fill_arc(40, 100, 20, 0, 90, badge.BLACK)
            ",
        )
        .expect("script runs");

    assert!(harness.is_black(10, 10));
    assert!(!harness.is_black(11, 11));
    assert!(harness.is_black(25, 20));

    // five pixels wide, round caps reach past the end points
    assert_eq!(harness.black_in(50, 36, 51, 45), 5);
    assert!(harness.is_black(8, 40));

    assert!(harness.is_black(170, 10));
    assert!(!harness.is_black(170, 25));
    assert!(!harness.is_black(150, 10));
    assert!(harness.is_black(220, 25));

    assert!(harness.is_black(100, 100));
    assert!(harness.is_black(115, 100));
    assert!(!harness.is_black(100, 113));
    assert!(!harness.is_black(250, 100));
    assert!(harness.black_in(245, 89, 256, 92) > 0);

    // counter-clockwise from 3 o'clock to 12 o'clock: upper right quadrant
    assert!(harness.is_black(50, 92));
    assert!(!harness.is_black(50, 108));
    assert!(!harness.is_black(30, 92));
}

#[test]
fn huge_shapes_return_promptly() {
    let mut harness = ScenarioHarness::new();
    harness
        .run_script(
            "
            badge.ugfx_init()
            badge.fill_circle(10, 10, 200000, badge.BLACK)
            ",
        )
        .expect("script runs");
    assert_eq!(harness.black_in(0, 0, 296, 128), 296 * 128);

    harness
        .run_script(
            "
            badge.clear(badge.WHITE)
            badge.fill_arc(148, 64, 2000000000, 0, 90, badge.BLACK)
            badge.thickline(-2000000000, 120, 2000000000, 120, badge.BLACK, 3, 1)
            badge.circle(148, 64, 2000000000, badge.BLACK)
            ",
        )
        .expect("script runs");
    assert!(harness.is_black(200, 10));
    assert!(!harness.is_black(100, 10));
    assert_eq!(harness.black_in(0, 119, 296, 122), 296 * 3);
}
