use atelier_engine::Canvas;
use atelier_engine::paint::Rgba8;
use atelier_engine::render::{CpuPresenter, replay};
use atelier_engine::scene::{Args, Op};

const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);

#[test]
fn translated_rect_lands_at_offset() {
    let mut canvas = Canvas::new(20, 20);
    canvas.fill((255.0, 0.0, 0.0)).unwrap();
    canvas.no_stroke();
    canvas.translate(10.0, 10.0);
    canvas.rect(0.0, 0.0, 4.0, 4.0).unwrap();

    let (pixmap, info) = CpuPresenter::rasterize(20, 20, canvas.commands());
    assert_eq!(info.skipped, 0);
    assert_eq!(pixmap.pixel(12, 12), Some(RED));
    assert_eq!(pixmap.pixel(2, 2), Some(Rgba8::TRANSPARENT));
}

#[test]
fn push_pop_scopes_transforms_during_replay() {
    let mut canvas = Canvas::new(20, 20);
    canvas.fill((255.0, 0.0, 0.0)).unwrap();
    canvas.no_stroke();
    canvas.push();
    canvas.translate(15.0, 0.0);
    canvas.pop();
    canvas.rect(0.0, 0.0, 3.0, 3.0).unwrap();

    let (pixmap, _) = CpuPresenter::rasterize(20, 20, canvas.commands());
    assert_eq!(pixmap.pixel(1, 1), Some(RED));
    assert_eq!(pixmap.pixel(16, 1), Some(Rgba8::TRANSPARENT));
}

#[test]
fn custom_and_malformed_commands_do_not_abort_the_frame() {
    let mut canvas = Canvas::new(10, 10);
    canvas.record(Op::Custom("sparkle".into()), Args::new());
    canvas.record(Op::Rect, Args::new().with("x", 1.0));
    canvas.background(90.0).unwrap();

    let out = replay(canvas.commands());
    assert_eq!(out.skipped, 2);
    assert_eq!(out.applied, 1);

    let (pixmap, _) = CpuPresenter::rasterize(10, 10, canvas.commands());
    assert_eq!(pixmap.pixel(5, 5), Some(Rgba8::new(90, 90, 90, 255)));
}
