//! Integration tests for the PDF templater library

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdf_templater::pdf::{count_pages, extract_metadata};
use pdf_templater::{Error, FillMode, PdfBuilder, QrSpec};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A page line shown either with `Tj` or as a kerned `TJ` array
enum Line<'a> {
    Plain(&'a str),
    Kerned(&'a [&'a str]),
}

/// Write a template with one page per entry in `pages`
fn write_template(dir: &Path, name: &str, pages: &[Vec<Line>]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 700.into()]),
        ];
        for line in lines {
            match line {
                Line::Plain(text) => {
                    operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
                }
                Line::Kerned(parts) => {
                    let mut items = Vec::new();
                    for (i, part) in parts.iter().enumerate() {
                        if i > 0 {
                            items.push(Object::Integer(-40));
                        }
                        items.push(Object::string_literal(*part));
                    }
                    operations.push(Operation::new("TJ", vec![Object::Array(items)]));
                }
            }
            operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Invoice template"),
    });
    doc.trailer.set("Info", info_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

/// Shown strings of a page, one entry per show-text operation
fn page_strings(pdf: &[u8], page_number: u32) -> Vec<String> {
    let doc = Document::load_mem(pdf).unwrap();
    let page_id = doc.get_pages()[&page_number];
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

    content
        .operations
        .iter()
        .filter_map(|op| match (op.operator.as_str(), op.operands.first()) {
            ("Tj", Some(Object::String(bytes, _))) => Some(String::from_utf8_lossy(bytes).into_owned()),
            ("TJ", Some(Object::Array(items))) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().ok())
                    .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                    .collect(),
            ),
            _ => None,
        })
        .collect()
}

#[test]
fn test_fill_single_page_template() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let template = write_template(
        temp_dir.path(),
        "template.pdf",
        &[vec![Line::Plain("Dear @name@,"), Line::Plain("Order @order@ for @name@")]],
    );

    let document = PdfBuilder::from_path(&template)
        .with_replacement("@name@", "Jane Doe")
        .with_replacement("@order@", "4711")
        .build()
        .unwrap();

    assert_eq!(
        page_strings(document.as_bytes(), 1),
        vec!["Dear Jane Doe,", "Order 4711 for Jane Doe"]
    );
}

#[test]
fn test_kerned_text_is_replaced() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let template = write_template(
        temp_dir.path(),
        "kerned.pdf",
        &[vec![Line::Kerned(&["Total: @am", "ount@ EUR"]), Line::Kerned(&["Unchanged", " text"])]],
    );

    let document = PdfBuilder::from_path(&template)
        .with_replacement("@amount@", "12.50")
        .build()
        .unwrap();

    let doc = Document::load_mem(document.as_bytes()).unwrap();
    let page_id = doc.get_pages()[&1];
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    let arrays: Vec<&Vec<Object>> = content
        .operations
        .iter()
        .filter(|op| op.operator == "TJ")
        .filter_map(|op| op.operands[0].as_array().ok())
        .collect();

    // every shown array collapses into one string, matched or not
    assert_eq!(arrays[0].len(), 1);
    assert_eq!(arrays[1].len(), 1);
    assert_eq!(
        page_strings(document.as_bytes(), 1),
        vec!["Total: 12.50 EUR", "Unchanged text"]
    );
}

#[test]
fn test_multiline_replacement() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let template = write_template(
        temp_dir.path(),
        "multiline.pdf",
        &[vec![Line::Plain("@l0@"), Line::Plain("@l1@"), Line::Plain("@l2@")]],
    );

    let document = PdfBuilder::from_path(&template)
        .with_multiline_replacement_mode(
            "Lucy in the sky with diamonds",
            20,
            FillMode::Bottom,
            ["@l0@", "@l1@", "@l2@"],
        )
        .build()
        .unwrap();

    assert_eq!(
        page_strings(document.as_bytes(), 1),
        vec!["", "Lucy in the sky with", "diamonds"]
    );
}

#[test]
fn test_multi_page_text_replacement() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let template = write_template(
        temp_dir.path(),
        "two-pages.pdf",
        &[vec![Line::Plain("Page one for @who@")], vec![Line::Plain("Page two for @who@")]],
    );

    let document = PdfBuilder::from_path(&template)
        .with_replacement("@who@", "you")
        .build()
        .unwrap();

    assert_eq!(page_strings(document.as_bytes(), 1), vec!["Page one for you"]);
    assert_eq!(page_strings(document.as_bytes(), 2), vec!["Page two for you"]);
}

#[test]
fn test_qr_code_is_placed() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let template = write_template(temp_dir.path(), "qr.pdf", &[vec![Line::Plain("Ticket @id@")]]);
    let output_path = temp_dir.path().join("ticket.pdf");

    PdfBuilder::from_path(&template)
        .with_replacement("@id@", "4711")
        .with_qr_code(QrSpec::from_code("4711").with_position(-20, -20).with_size(100))
        .build()
        .unwrap()
        .save(&output_path)
        .unwrap();

    assert_eq!(count_pages(&output_path).unwrap(), 1);

    let doc = Document::load(&output_path).unwrap();
    let page_id = doc.get_pages()[&1];
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = match page.get(b"Resources").unwrap() {
        Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
        Object::Dictionary(dict) => dict,
        other => panic!("unexpected resources {:?}", other),
    };
    let xobjects = match resources.get(b"XObject").unwrap() {
        Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
        Object::Dictionary(dict) => dict,
        other => panic!("unexpected xobjects {:?}", other),
    };
    assert_eq!(xobjects.len(), 1);

    // inherited font resources survive on the page
    assert!(resources.get(b"Font").is_ok());
    assert_eq!(page_strings(&std::fs::read(&output_path).unwrap(), 1), vec!["Ticket 4711"]);
}

#[test]
fn test_qr_code_on_multi_page_template_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let template = write_template(
        temp_dir.path(),
        "two-pages.pdf",
        &[vec![Line::Plain("one")], vec![Line::Plain("two")]],
    );

    let result = PdfBuilder::from_path(&template)
        .with_qr_code(QrSpec::from_code("4711"))
        .build();

    assert!(matches!(result, Err(Error::TooManyPages(2))));
}

#[test]
fn test_validation_happens_before_loading() {
    // the template does not exist, the ligature error still wins
    let result = PdfBuilder::from_path("does/not/exist.pdf")
        .with_replacement("@fineprint@", "x")
        .build();
    assert!(matches!(result, Err(Error::LigatureInSearchKey { .. })));

    let result = PdfBuilder::from_path("does/not/exist.pdf").build();
    assert!(matches!(result, Err(Error::FileNotFound(_))));
}

#[test]
fn test_from_bytes_and_write_to() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let template = write_template(temp_dir.path(), "bytes.pdf", &[vec![Line::Plain("Hi @x@")]]);
    let bytes = std::fs::read(&template).unwrap();

    let mut out = Vec::new();
    PdfBuilder::from_bytes(bytes)
        .with_replacement("@x@", "there")
        .build()
        .unwrap()
        .write_to(&mut out)
        .unwrap();

    assert!(out.starts_with(b"%PDF"));
    assert_eq!(page_strings(&out, 1), vec!["Hi there"]);
}

#[test]
fn test_extract_metadata() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let template = write_template(
        temp_dir.path(),
        "meta.pdf",
        &[vec![Line::Plain("a")], vec![Line::Plain("b")], vec![Line::Plain("c")]],
    );

    let metadata = extract_metadata(&template).unwrap();
    assert_eq!(metadata.page_count, 3);
    assert_eq!(metadata.title.as_deref(), Some("Invoice template"));
    assert_eq!(metadata.author, None);

    let bounds = metadata.first_page.unwrap();
    assert_eq!((bounds.width, bounds.height), (595.0, 842.0));
}
