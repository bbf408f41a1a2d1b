use chrono::NaiveDate;
use saverabbit_rs::bitmap::Bitmap;
use saverabbit_rs::clipboard::ImageSource;
use saverabbit_rs::preview::{fit, Placement};
use saverabbit_rs::save::SaveController;
use saverabbit_rs::selector::DateHourSelector;
use saverabbit_rs::session::{RefreshOutcome, Session};
use saverabbit_rs::status::{Severity, Status};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

struct Clipboard(Mutex<Option<Bitmap>>);

impl Clipboard {
    fn holding(bitmap: Option<Bitmap>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(bitmap)))
    }

    fn put(&self, bitmap: Option<Bitmap>) {
        *self.0.lock().unwrap() = bitmap;
    }
}

impl ImageSource for Clipboard {
    fn sample(&self) -> Option<Bitmap> {
        self.0.lock().unwrap().clone()
    }
}

/// Blocks inside `sample` until the test lets it go.
struct Stalling {
    entered: Barrier,
    release: Barrier,
    samples: AtomicUsize,
}

impl ImageSource for Stalling {
    fn sample(&self) -> Option<Bitmap> {
        self.entered.wait();
        self.release.wait();
        self.samples.fetch_add(1, Ordering::SeqCst);
        Some(Bitmap::filled(2, 2, [5, 5, 5, 255]))
    }
}

fn jan_fifth(hour: u32) -> DateHourSelector {
    DateHourSelector::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), hour)
}

#[test]
fn empty_clipboard_refresh_shows_no_image() {
    let session = Session::new(Clipboard::holding(None), (200, 200));
    session.refresh();
    assert_eq!(
        session.status(),
        Status::new("[No image]", Severity::Neutral)
    );
}

#[test]
fn wide_image_is_letterboxed_in_square_viewport() {
    let clipboard = Clipboard::holding(Some(Bitmap::filled(100, 50, [0, 0, 255, 255])));
    let session = Session::new(clipboard, (200, 200));
    session.refresh();

    assert_eq!(
        fit((100, 50), (200, 200)),
        Some(Placement {
            x: 0,
            y: 50,
            width: 200,
            height: 100
        })
    );
    let (_, frame) = session.frame_since(None).unwrap();
    assert_eq!(frame.get_pixel(100, 49).0, [238, 238, 238, 255]);
    assert_eq!(frame.get_pixel(100, 50).0, [0, 0, 255, 255]);
    assert_eq!(frame.get_pixel(100, 149).0, [0, 0, 255, 255]);
    assert_eq!(frame.get_pixel(100, 150).0, [238, 238, 238, 255]);
}

#[test]
fn save_writes_named_file_and_advances_hour() {
    let dir = tempfile::tempdir().unwrap();
    let clipboard = Clipboard::holding(Some(Bitmap::filled(8, 8, [1, 2, 3, 255])));
    let session = Session::new(clipboard, (200, 200));
    let saver = SaveController::new(dir.path(), "rabbit");
    let mut selector = jan_fifth(9);

    let saved = session.save(&saver, &mut selector).unwrap().unwrap();
    assert_eq!(saved.path, dir.path().join("rabbit-2024-01-05-9.png"));
    assert!(saved.path.is_file());
    assert_eq!(selector.hour(), 10);
    assert_eq!(
        session.status(),
        Status::new("Saved to: rabbit-2024-01-05-9.png", Severity::Success)
    );
}

#[test]
fn save_into_unwritable_directory_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let clipboard = Clipboard::holding(Some(Bitmap::filled(8, 8, [1, 2, 3, 255])));
    let session = Session::new(clipboard, (200, 200));
    let saver = SaveController::new(dir.path().join("does-not-exist"), "rabbit");
    let mut selector = jan_fifth(9);

    assert!(session.save(&saver, &mut selector).is_err());
    let status = session.status();
    assert_eq!(status.severity, Severity::Error);
    assert!(status
        .message
        .ends_with(") Failed to save to: rabbit-2024-01-05-9.png"));
    assert_eq!(selector.hour(), 9);
}

#[test]
fn save_reads_the_clipboard_not_the_preview() {
    let dir = tempfile::tempdir().unwrap();
    let clipboard = Clipboard::holding(Some(Bitmap::filled(4, 4, [10, 0, 0, 255])));
    let session = Session::new(clipboard.clone(), (50, 50));
    session.refresh();
    clipboard.put(Some(Bitmap::filled(6, 3, [0, 10, 0, 255])));

    let saver = SaveController::new(dir.path(), "rabbit");
    let saved = session.save(&saver, &mut jan_fifth(1)).unwrap().unwrap();
    let written = image::open(saved.path).unwrap().to_rgba8();
    assert_eq!(written.dimensions(), (6, 3));
    assert_eq!(session.preview().unwrap().dimensions(), (4, 4));
}

#[test]
fn save_without_image_leaves_status_alone() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new(Clipboard::holding(None), (50, 50));
    session.refresh();
    let saver = SaveController::new(dir.path(), "rabbit");
    let mut selector = jan_fifth(9);

    assert_eq!(session.save(&saver, &mut selector).unwrap(), None);
    assert_eq!(session.status(), Status::no_image());
    assert_eq!(selector.hour(), 9);
}

#[test]
fn second_refresh_while_busy_is_dropped() {
    let source = Arc::new(Stalling {
        entered: Barrier::new(2),
        release: Barrier::new(2),
        samples: AtomicUsize::new(0),
    });
    let session = Arc::new(Session::new(source.clone(), (20, 20)));

    let background = {
        let session = session.clone();
        thread::spawn(move || session.refresh())
    };
    source.entered.wait();
    assert_eq!(session.refresh(), RefreshOutcome::Skipped);
    source.release.wait();

    assert_eq!(
        background.join().unwrap(),
        RefreshOutcome::Changed { has_image: true }
    );
    assert_eq!(source.samples.load(Ordering::SeqCst), 1);
    assert!(session.has_image());
}
