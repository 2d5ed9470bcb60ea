// tests/document_pipeline.rs
use plan_scrape::engine::EntityRef;
use plan_scrape::progress::{NullProgress, Progress};
use plan_scrape::runner::{decode_document, scrape_document, DecodeStats};
use plan_scrape::ScrapeError;

const SAMPLE: &str = include_str!("fixtures/plan_sample.html");

#[derive(Default)]
struct Recorder {
    begun: Option<usize>,
    done: Vec<String>,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.begun = Some(total); }
    fn item_done(&mut self, id: &str) { self.done.push(id.to_string()); }
}

#[test]
fn sample_document_counts() {
    let mut rec = Recorder::default();
    let decoded = decode_document(SAMPLE, &mut rec).unwrap();

    assert_eq!(
        decoded.stats,
        DecodeStats {
            tables: 5,
            skipped_tables: 1,
            unknown_tables: 1,
            timetables: 7,
            lessons: 5,
            assigned: 1,
            ambiguous: 0,
        }
    );
    assert_eq!(rec.begun, Some(5));
    assert_eq!(rec.done, vec!["o3", "n7", "s21", "o99"]);
    assert_eq!(decoded.generation_date, "30.08.2024");
}

#[test]
fn class_lesson_receives_teacher_table_mark() {
    let scrape = scrape_document(SAMPLE, "sample", &mut NullProgress).unwrap();
    let class = &scrape.data.timetables["o3"];
    assert_eq!(class.len(), 2);

    let english = &class[0];
    assert_eq!(english.day, "Poniedziałek");
    assert_eq!(english.lesson_num, "1");
    assert_eq!(english.time, "8:00 - 8:45");
    assert_eq!(english.subject, "j. angielski - 1/2");
    assert_eq!(english.group, Some(EntityRef::new("o3", "3A (1/2)")));
    assert_eq!(english.teacher, Some(EntityRef::new("n7", "J.Kowalski (JK)")));
    assert_eq!(english.room, Some(EntityRef::new("s21", "21")));

    // rowspan=2 is one lesson, reported at its first row
    let maths = &class[1];
    assert_eq!((maths.day.as_str(), maths.lesson_num.as_str()), ("Wtorek", "1"));
    assert_eq!(maths.subject, "matematyka");
    assert_eq!(maths.room, Some(EntityRef::new("s22", "22 gim.")));
}

#[test]
fn teacher_and_room_views_keep_their_own_entity() {
    let scrape = scrape_document(SAMPLE, "sample", &mut NullProgress).unwrap();
    let t = &scrape.data.timetables;

    let teacher_view = &t["n7"][0];
    assert_eq!(teacher_view.subject, "j. angielski - 1/2");
    assert_eq!(teacher_view.teacher.as_ref().map(|r| r.id.as_str()), Some("n7"));
    assert_eq!(teacher_view.group.as_ref().map(|r| r.id.as_str()), Some("o3"));

    let room_view = &t["s21"][0];
    assert_eq!(room_view.room.as_ref().map(|r| r.id.as_str()), Some("s21"));
    assert_eq!(room_view.teacher.as_ref().map(|r| r.id.as_str()), Some("n7"));
    assert_eq!(room_view.time, "8:00 - 8:45");
}

#[test]
fn unknown_table_becomes_a_class() {
    let scrape = scrape_document(SAMPLE, "sample", &mut NullProgress).unwrap();
    let data = &scrape.data;

    assert_eq!(data.classes.get("o99").map(String::as_str), Some("Koło szachowe"));
    let lessons = &data.timetables["o99"];
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].time, "14:25 - 15:10");
    assert_eq!(lessons[0].group, Some(EntityRef::new("o99", "Koło szachowe")));
    assert!(lessons[0].teacher.is_none() && lessons[0].room.is_none());
}

#[test]
fn entities_without_tables_have_empty_timetables() {
    let scrape = scrape_document(SAMPLE, "sample", &mut NullProgress).unwrap();
    let data = &scrape.data;
    for id in ["o4", "n8", "s22"] {
        assert_eq!(data.timetables.get(id).map(Vec::len), Some(0), "{id}");
    }
    assert_eq!(data.classes.len(), 3);
    assert_eq!(data.teachers.len(), 2);
    assert_eq!(data.rooms.len(), 2);
}

#[test]
fn document_without_navigation_is_rejected() {
    let html = SAMPLE.replace("<nav>", "<aside>").replace("</nav>", "</aside>");
    assert!(matches!(
        decode_document(&html, &mut NullProgress),
        Err(ScrapeError::NavigationMissing)
    ));
}
