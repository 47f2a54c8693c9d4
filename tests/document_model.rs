// tests/document_model.rs

use edi::document::{ClickAction, Document, Insertion, Position, Tag, TextBuffer, TextIndex};
use edi::errors::SinkError;
use edi::types::{CommandId, Visibility};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const REGION: &str = "shell1";

fn block(id: u64, line: &str) -> Vec<Insertion> {
    let id = CommandId::new(id);
    vec![
        Insertion::tagged("» ", Tag::Prompt(id)),
        Insertion::tagged(line, Tag::Echo(id)),
        Insertion::tagged("\n", Tag::Output(id)),
        Insertion::plain("\n"),
    ]
}

fn append(doc: &mut Document, id: u64, text: &str) -> Result<Position, SinkError> {
    let tag = Tag::Output(CommandId::new(id));
    doc.insert_text(REGION, &TextIndex::TagEnd(tag.clone()), text.to_string(), Some(tag))
}

#[test]
fn first_block_is_anchored_on_line_one() -> TestResult {
    let mut doc = Document::new();
    doc.create_region(REGION)?;

    let anchor = doc.insert_block(REGION, block(1, "echo a"))?;
    assert_eq!(anchor, Position::line_start(1));
    assert_eq!(doc.text(REGION)?, "» echo a\n\n");
    assert_eq!(doc.line_count(REGION)?, 3);
    Ok(())
}

#[test]
fn block_after_user_text_starts_on_a_fresh_line() -> TestResult {
    let mut doc = Document::new();
    doc.create_region(REGION)?;
    doc.insert_text(REGION, &TextIndex::End, "notes".to_string(), None)?;

    let anchor = doc.insert_block(REGION, block(1, "ls"))?;
    assert_eq!(anchor, Position::line_start(2));
    assert_eq!(doc.line(REGION, 1)?, Some("notes".to_string()));
    assert_eq!(doc.line(REGION, 2)?, Some("» ls".to_string()));
    Ok(())
}

#[test]
fn appends_land_inside_their_own_output_region() -> TestResult {
    let mut doc = Document::new();
    doc.create_region(REGION)?;

    doc.insert_block(REGION, block(1, "first"))?;
    append(&mut doc, 1, "a\n")?;
    let second = doc.insert_block(REGION, block(2, "second"))?;
    assert_eq!(second, Position::line_start(4));

    // Late output of the first command must not spill into the second block.
    append(&mut doc, 1, "b\n")?;
    append(&mut doc, 2, "x\n")?;

    assert_eq!(doc.text(REGION)?, "» first\na\nb\n\n» second\nx\n\n");
    assert_eq!(
        doc.tag_text(REGION, &Tag::Output(CommandId::new(1)))?,
        Some("\na\nb\n".to_string())
    );
    assert_eq!(
        doc.tag_text(REGION, &Tag::Echo(CommandId::new(2)))?,
        Some("second".to_string())
    );
    Ok(())
}

#[test]
fn partial_lines_are_kept_verbatim() -> TestResult {
    let mut doc = Document::new();
    doc.create_region(REGION)?;
    doc.insert_block(REGION, block(1, "printf"))?;

    append(&mut doc, 1, "no newline")?;
    append(&mut doc, 1, " still same line")?;

    assert_eq!(doc.text(REGION)?, "» printf\nno newline still same line\n");
    Ok(())
}

#[test]
fn hidden_output_is_elided_from_render_only() -> TestResult {
    let mut doc = Document::new();
    doc.create_region(REGION)?;
    doc.insert_block(REGION, block(1, "first"))?;
    append(&mut doc, 1, "a\n")?;
    doc.insert_block(REGION, block(2, "second"))?;

    doc.configure_tag_visibility(REGION, Tag::Output(CommandId::new(1)), true)?;
    assert_eq!(doc.render(REGION)?, "» first\n» second\n\n");
    assert_eq!(doc.text(REGION)?, "» first\na\n\n» second\n\n");
    assert_eq!(doc.visibility(CommandId::new(1)), Visibility::Hidden);

    doc.configure_tag_visibility(REGION, Tag::Output(CommandId::new(1)), false)?;
    assert_eq!(doc.render(REGION)?, doc.text(REGION)?);
    Ok(())
}

#[test]
fn click_on_bound_prompt_toggles_output() -> TestResult {
    let mut doc = Document::new();
    doc.create_region(REGION)?;
    doc.insert_block(REGION, block(1, "ls"))?;
    let id = CommandId::new(1);
    doc.bind_click(REGION, Tag::Prompt(id), ClickAction::ToggleOutput(id))?;

    assert_eq!(doc.click(REGION, &Tag::Prompt(id))?, Some(Visibility::Hidden));
    assert_eq!(doc.render(REGION)?, "» ls\n");
    assert_eq!(doc.click(REGION, &Tag::Prompt(id))?, Some(Visibility::Shown));
    assert_eq!(doc.render(REGION)?, "» ls\n\n");

    // Nothing is bound to the echo.
    assert_eq!(doc.click(REGION, &Tag::Echo(id))?, None);
    Ok(())
}

#[test]
fn unknown_region_and_tag_are_rejected() -> TestResult {
    let mut doc = Document::new();
    assert_eq!(
        doc.line_count("nope"),
        Err(SinkError::UnknownRegion("nope".to_string()))
    );

    doc.create_region(REGION)?;
    assert_eq!(
        doc.create_region(REGION),
        Err(SinkError::RegionExists(REGION.to_string()))
    );
    assert!(matches!(
        append(&mut doc, 9, "lost\n"),
        Err(SinkError::UnknownTag { .. })
    ));
    Ok(())
}

#[test]
fn indexes_resolve_to_line_and_character_column() -> TestResult {
    let mut doc = Document::new();
    doc.create_region(REGION)?;
    doc.insert_block(REGION, block(1, "echo a"))?;

    assert_eq!(doc.query_index(REGION, &TextIndex::End)?, Position::new(3, 0));
    // "» echo a" is eight characters, the prompt marker being one.
    assert_eq!(doc.query_index(REGION, &TextIndex::LineEnd(1))?, Position::new(1, 8));
    assert_eq!(
        doc.query_index(REGION, &TextIndex::TagEnd(Tag::Output(CommandId::new(1))))?,
        Position::new(2, 0)
    );
    assert_eq!(Position::new(2, 0).to_string(), "2.0");
    Ok(())
}

#[test]
fn appends_report_where_each_chunk_starts() -> TestResult {
    let mut doc = Document::new();
    doc.create_region(REGION)?;
    doc.insert_block(REGION, block(1, "cmd"))?;

    assert_eq!(append(&mut doc, 1, "a\n")?, Position::new(2, 0));
    assert_eq!(append(&mut doc, 1, "b\n")?, Position::new(3, 0));
    assert_eq!(append(&mut doc, 1, "xy")?, Position::new(4, 0));
    assert_eq!(append(&mut doc, 1, "z\n")?, Position::new(4, 2));
    assert_eq!(doc.line(REGION, 4)?, Some("xyz".to_string()));
    assert_eq!(doc.line_count(REGION)?, 6);
    Ok(())
}

#[test]
fn inserts_inside_a_span_keep_lines_consistent() -> TestResult {
    let mut doc = Document::new();
    doc.create_region(REGION)?;
    doc.insert_text(REGION, &TextIndex::End, "é\nßx\n".to_string(), None)?;

    let tag = Tag::Named("mark".to_string());
    let at = doc.insert_text(
        REGION,
        &TextIndex::At(Position::new(2, 1)),
        "Y".to_string(),
        Some(tag.clone()),
    )?;
    assert_eq!(at, Position::new(2, 1));
    assert_eq!(doc.text(REGION)?, "é\nßYx\n");
    assert_eq!(doc.line(REGION, 2)?, Some("ßYx".to_string()));
    assert_eq!(doc.line(REGION, 3)?, Some(String::new()));
    assert_eq!(doc.line(REGION, 4)?, None);
    assert_eq!(doc.line_count(REGION)?, 3);
    assert_eq!(doc.query_index(REGION, &TextIndex::TagEnd(tag))?, Position::new(2, 2));
    assert_eq!(doc.query_index(REGION, &TextIndex::LineEnd(1))?, Position::new(1, 1));

    // Out-of-range positions clamp to the end.
    assert_eq!(
        doc.query_index(REGION, &TextIndex::At(Position::new(9, 9)))?,
        Position::new(3, 0)
    );
    Ok(())
}

#[test]
fn byte_offsets_inside_a_character_round_down() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "é\n".to_string(), None);

    // Offset 1 is inside the two-byte 'é'.
    assert_eq!(buffer.position_of(1), Position::new(1, 0));
    assert_eq!(buffer.position_of(2), Position::new(1, 1));
    assert_eq!(buffer.position_of(100), Position::new(2, 0));
}
