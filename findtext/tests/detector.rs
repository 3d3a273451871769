//! Detector behavior against a scripted engine, so the geometry and session
//! accounting can be pinned down without a Tesseract install.

use std::cell::RefCell;
use std::rc::Rc;

use findtext::{
    BoundingBox, Engine, Error, FindText, Granularity, RawBox, RegionBlock, Result, Session,
};
use image::GrayImage;

/// One scripted session: the boxes its detection pass returns and the
/// transcriptions handed back per box, in detection order.
#[derive(Clone, Default)]
struct Script {
    boxes: Vec<RawBox>,
    texts: Vec<&'static str>,
    fail_detect: bool,
}

#[derive(Default)]
struct Stats {
    sessions_opened: usize,
    recognize_calls: usize,
    granularities: Vec<Granularity>,
    loaded_sizes: Vec<(u32, u32)>,
}

/// Engine that plays back one [`Script`] per opened session, front to back,
/// while counting every call it sees.
#[derive(Clone)]
struct FakeEngine {
    scripts: Rc<RefCell<Vec<Script>>>,
    stats: Rc<RefCell<Stats>>,
}

impl FakeEngine {
    fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Rc::new(RefCell::new(scripts)),
            stats: Rc::new(RefCell::new(Stats::default())),
        }
    }
}

impl Engine for FakeEngine {
    type Session = FakeSession;

    fn open_session(&self, _lang: &str) -> Result<FakeSession> {
        self.stats.borrow_mut().sessions_opened += 1;
        let mut scripts = self.scripts.borrow_mut();
        assert!(
            !scripts.is_empty(),
            "detector opened more sessions than were scripted"
        );
        let script = scripts.remove(0);
        Ok(FakeSession {
            script,
            stats: Rc::clone(&self.stats),
            cursor: 0,
        })
    }
}

struct FakeSession {
    script: Script,
    stats: Rc<RefCell<Stats>>,
    cursor: usize,
}

impl Session for FakeSession {
    fn load_image(&mut self, buffer: &GrayImage) -> Result<()> {
        self.stats
            .borrow_mut()
            .loaded_sizes
            .push((buffer.width(), buffer.height()));
        Ok(())
    }

    fn detect_regions(&mut self, granularity: Granularity) -> Result<Vec<RawBox>> {
        self.stats.borrow_mut().granularities.push(granularity);
        if self.script.fail_detect {
            return Err(Error::Engine("scripted detection failure".into()));
        }
        Ok(self.script.boxes.clone())
    }

    fn recognize_text(&mut self, _region: &RawBox) -> Result<String> {
        self.stats.borrow_mut().recognize_calls += 1;
        let text = self.script.texts.get(self.cursor).copied().unwrap_or("");
        self.cursor += 1;
        Ok(text.to_string())
    }
}

fn raw(x: i32, y: i32, w: i32, h: i32) -> RawBox {
    RawBox { x, y, w, h }
}

fn script(boxes: Vec<RawBox>, texts: Vec<&'static str>) -> Script {
    Script {
        boxes,
        texts,
        fail_detect: false,
    }
}

#[test]
fn flat_words_pass_engine_geometry_through() {
    let engine = FakeEngine::new(vec![script(
        vec![raw(10, 20, 80, 30), raw(100, 20, 60, 30)],
        vec!["HELLO\n", " WORLD "],
    )]);
    let detector = FindText::with_engine(engine.clone(), "eng");

    let words = detector.find_words(GrayImage::new(300, 100)).unwrap();

    assert_eq!(words.len(), 2);
    assert_eq!(words[0].bounding_box(), BoundingBox::new(10, 20, 80, 30));
    assert_eq!(words[1].bounding_box(), BoundingBox::new(100, 20, 60, 30));
    assert_eq!(words[0].text(), "HELLO");
    assert_eq!(words[1].text(), "WORLD");

    let stats = engine.stats.borrow();
    assert_eq!(stats.sessions_opened, 1);
    assert_eq!(stats.granularities, vec![Granularity::Word]);
    assert_eq!(stats.recognize_calls, 2);
}

#[test]
fn unknown_granularity_is_rejected_before_any_engine_call() {
    let engine = FakeEngine::new(Vec::new());
    let detector = FindText::with_engine(engine.clone(), "eng");

    let err = detector
        .find(GrayImage::new(10, 10), "paragraph")
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert_eq!(engine.stats.borrow().sessions_opened, 0);
}

#[test]
fn deep_pass_remaps_word_boxes_into_original_space() {
    // One line "HELLO WORLD" at {10,20,200,30}, offset 5: the strip spans
    // [15, 55], and the crop-space word {10,5,80,30} must come back at
    // {10, 20, 80, 30}.
    let engine = FakeEngine::new(vec![
        script(vec![raw(10, 20, 200, 30)], vec!["HELLO WORLD"]),
        script(vec![raw(10, 5, 80, 30)], vec!["HELLO"]),
    ]);
    let detector = FindText::with_engine(engine.clone(), "eng");

    let words = detector
        .find_words_deep(GrayImage::new(300, 100), 5)
        .unwrap();

    assert_eq!(words.len(), 1);
    assert_eq!(words[0].bounding_box(), BoundingBox::new(10, 20, 80, 30));
    assert_eq!((words[0].top_left().x, words[0].top_left().y), (10, 20));
    assert_eq!(
        (words[0].bottom_right().x, words[0].bottom_right().y),
        (90, 50)
    );
    assert_eq!(words[0].text(), "HELLO");

    let stats = engine.stats.borrow();
    assert_eq!(stats.loaded_sizes, vec![(300, 100), (300, 40)]);
    assert_eq!(
        stats.granularities,
        vec![Granularity::Line, Granularity::Word]
    );
}

#[test]
fn zero_offset_deep_pass_matches_flat_pass_on_the_line_crop() {
    let image = GrayImage::new(120, 60);
    let line = script(vec![raw(0, 10, 100, 20)], vec!["ABCD"]);
    let inner = script(vec![raw(5, 3, 30, 14), raw(40, 2, 25, 15)], vec!["AB", "CD"]);

    let deep_engine = FakeEngine::new(vec![line, inner.clone()]);
    let deep = FindText::with_engine(deep_engine, "eng")
        .find_words_deep(image.clone(), 0)
        .unwrap();

    // Flat pass on the line's own crop, remapped by the crop's known origin,
    // must reproduce the deep result exactly.
    let flat_engine = FakeEngine::new(vec![inner]);
    let cropped = findtext::strip(&image, 10, 30);
    let mut flat: Vec<RegionBlock> = FindText::with_engine(flat_engine, "eng")
        .find_words(cropped)
        .unwrap();
    for block in &mut flat {
        let b = block.bounding_box();
        block.replace_box(BoundingBox::new(b.x, b.y + 10, b.width, b.height));
    }

    assert_eq!(deep, flat);
    assert_eq!(deep[0].bounding_box(), BoundingBox::new(5, 13, 30, 14));
    assert_eq!(deep[1].bounding_box(), BoundingBox::new(40, 12, 25, 15));
}

#[test]
fn find_lines_is_idempotent_for_a_fixed_engine() {
    let line = script(vec![raw(3, 7, 90, 12), raw(3, 25, 40, 12)], vec!["one", "two"]);
    let engine = FakeEngine::new(vec![line.clone(), line]);
    let detector = FindText::with_engine(engine, "eng");
    let image = GrayImage::new(100, 50);

    let first = detector.find_lines(image.clone()).unwrap();
    let second = detector.find_lines(image).unwrap();

    assert_eq!(first, second);
}

#[test]
fn first_inner_failure_aborts_the_whole_call() {
    let engine = FakeEngine::new(vec![
        script(
            vec![raw(0, 0, 50, 10), raw(0, 20, 50, 10)],
            vec!["first", "second"],
        ),
        Script {
            fail_detect: true,
            ..Script::default()
        },
    ]);
    let detector = FindText::with_engine(engine.clone(), "eng");

    let err = detector
        .find_words_deep(GrayImage::new(60, 40), 0)
        .unwrap_err();

    assert!(matches!(err, Error::Engine(_)));
    // Line session plus the failing first word session; the second line is
    // never attempted.
    assert_eq!(engine.stats.borrow().sessions_opened, 2);
}

#[test]
fn deep_pass_opens_one_session_per_line_plus_the_line_pass() {
    let engine = FakeEngine::new(vec![
        script(
            vec![raw(0, 0, 50, 8), raw(0, 10, 50, 8), raw(0, 20, 50, 8)],
            vec!["a", "b", "c"],
        ),
        script(Vec::new(), Vec::new()),
        script(Vec::new(), Vec::new()),
        script(Vec::new(), Vec::new()),
    ]);
    let detector = FindText::with_engine(engine.clone(), "eng");

    let words = detector.find_words_deep(GrayImage::new(60, 40), 2).unwrap();

    assert!(words.is_empty());
    let stats = engine.stats.borrow();
    assert_eq!(stats.sessions_opened, 4);
    assert_eq!(
        stats.granularities,
        vec![
            Granularity::Line,
            Granularity::Word,
            Granularity::Word,
            Granularity::Word,
        ]
    );
}

#[test]
fn line_at_the_top_edge_clamps_the_strip_and_the_remap() {
    // top = 2 - 5 < 0, so the strip starts at row 0 and the remap shifts by
    // the clamped origin, not by the requested one.
    let engine = FakeEngine::new(vec![
        script(vec![raw(0, 2, 50, 10)], vec!["edge"]),
        script(vec![raw(4, 1, 10, 8)], vec!["edge"]),
    ]);
    let detector = FindText::with_engine(engine.clone(), "eng");

    let words = detector.find_words_deep(GrayImage::new(60, 40), 5).unwrap();

    assert_eq!(words.len(), 1);
    assert_eq!(words[0].bounding_box(), BoundingBox::new(4, 1, 10, 8));
    assert_eq!(engine.stats.borrow().loaded_sizes, vec![(60, 40), (60, 17)]);
}

#[test]
fn strip_fully_outside_the_buffer_yields_no_words_for_that_line() {
    // A scripted line below the buffer: its strip clamps to zero height, the
    // line contributes nothing, and no inner session is opened for it.
    let engine = FakeEngine::new(vec![script(vec![raw(0, 200, 50, 10)], vec!["ghost"])]);
    let detector = FindText::with_engine(engine.clone(), "eng");

    let words = detector.find_words_deep(GrayImage::new(60, 100), 0).unwrap();

    assert!(words.is_empty());
    let stats = engine.stats.borrow();
    assert_eq!(stats.sessions_opened, 1);
    assert_eq!(stats.granularities, vec![Granularity::Line]);
}

#[test]
fn empty_recognition_results_are_preserved_not_dropped() {
    let engine = FakeEngine::new(vec![script(
        vec![raw(0, 0, 10, 10), raw(20, 0, 10, 10)],
        vec!["", "X"],
    )]);
    let detector = FindText::with_engine(engine, "eng");

    let words = detector.find_words(GrayImage::new(40, 20)).unwrap();

    assert_eq!(words.len(), 2);
    assert_eq!(words[0].text(), "");
    assert_eq!(words[1].text(), "X");
}
