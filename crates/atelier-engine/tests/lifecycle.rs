use std::cell::Cell;

use atelier_engine::frame::TickOutcome;
use atelier_engine::render::BackendKind;
use atelier_engine::scene::Op;
use atelier_engine::{Engine, EngineConfig, FnSketch};

fn engine() -> Engine<'static> {
    Engine::new(EngineConfig::headless(20, 20).with_backends(vec![BackendKind::Cpu]))
}

#[test]
fn setup_runs_exactly_once() {
    let setups = Cell::new(0);
    let draws = Cell::new(0);
    let mut sketch = FnSketch::new()
        .setup(|_| {
            setups.set(setups.get() + 1);
            Ok(())
        })
        .draw(|_| {
            draws.set(draws.get() + 1);
            Ok(())
        });

    let mut engine = engine();
    assert_eq!(engine.run_frames(&mut sketch, 4), 4);
    drop(engine);

    assert_eq!(setups.get(), 1);
    assert_eq!(draws.get(), 4);
}

#[test]
fn no_loop_draws_once_until_redraw() {
    let mut sketch = FnSketch::new()
        .setup(|c| {
            c.no_loop();
            Ok(())
        })
        .draw(|c| {
            c.rect(1.0, 1.0, 5.0, 5.0)?;
            Ok(())
        });

    let mut engine = engine();
    assert_eq!(engine.run_frames(&mut sketch, 5), 1);
    assert_eq!(engine.frame_count(), 1);
    assert_eq!(engine.tick(&mut sketch), TickOutcome::Frozen);

    engine.canvas_mut().redraw();
    assert_eq!(engine.tick(&mut sketch), TickOutcome::Drew { frame: 1 });
    assert_eq!(engine.frame_count(), 2);
    assert_eq!(engine.tick(&mut sketch), TickOutcome::Frozen);
}

#[test]
fn setup_output_is_replayed_every_frame() {
    let mut sketch = FnSketch::new()
        .setup(|c| {
            c.background(30.0)?;
            c.rect(0.0, 0.0, 4.0, 4.0)?;
            c.rect(6.0, 6.0, 2.0, 2.0)?;
            Ok(())
        })
        .draw(|c| {
            c.circle(10.0, 10.0, 3.0)?;
            Ok(())
        });

    let mut engine = engine();
    assert!(engine.tick(&mut sketch).drew());

    let first = engine.canvas().commands();
    assert_eq!(first[0].op, Op::Background, "setup background leads the first frame");
    let prefix: Vec<_> = first[1..3].to_vec();
    assert!(prefix.iter().all(|c| c.op == Op::Rect && c.meta.frame.is_none()));
    assert!(prefix[0].seq() < prefix[1].seq());
    assert_eq!(first[3].op, Op::Circle);

    for tick in 1..4 {
        assert!(engine.tick(&mut sketch).drew());
        let cmds = engine.canvas().commands();
        assert_eq!(cmds.len(), 3, "tick {tick}");
        assert_eq!(&cmds[0..2], &prefix[..], "tick {tick}");
        assert_eq!(cmds[2].op, Op::Circle);
        assert_eq!(cmds[2].meta.frame, Some(tick));
        assert!(cmds[2].seq() > prefix[1].seq());
    }
}

#[test]
fn setup_background_stays_on_the_surface() {
    let dir = std::env::temp_dir().join(format!("atelier-lifecycle-{}", std::process::id()));
    let mut sketch = FnSketch::new()
        .setup(|c| {
            c.background(0.0)?;
            Ok(())
        })
        .draw(|c| {
            c.circle(10.0, 10.0, 2.0)?;
            Ok(())
        });

    let mut engine = engine();
    let mut corners = Vec::new();
    for _ in 0..2 {
        engine.tick(&mut sketch);
        let path = engine.save_frame(dir.join("bg-#.png"));
        let img = image::open(&path).unwrap().to_rgba8();
        corners.push(img.get_pixel(0, 0).0);
    }

    assert_eq!(corners, vec![[0, 0, 0, 255], [0, 0, 0, 255]]);
}

#[test]
fn failing_draw_keeps_the_loop_alive() {
    let calls = Cell::new(0);
    let mut sketch = FnSketch::new().draw(|_| {
        calls.set(calls.get() + 1);
        if calls.get() == 1 {
            anyhow::bail!("first frame fails");
        }
        Ok(())
    });

    let mut engine = engine();
    assert!(engine.tick(&mut sketch).drew());
    assert_eq!(engine.frame_count(), 0);
    assert!(engine.tick(&mut sketch).drew());
    assert_eq!(engine.frame_count(), 1);
}
