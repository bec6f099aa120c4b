// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use indoc::{formatdoc, indoc};
use paste_normalizer::{
    convert_pasted_content_from_word_online, normalize_paste,
    parse_fragment_lossy, ClipboardData, ListType, NormalizedPaste,
    PasteOptions, PasteSource, ToHtml,
};
use speculoos::{assert_that, AssertionFailure, Spec};

trait NormalizesTo {
    fn normalizes_to(&self, expected: &str);
}

impl<T> NormalizesTo for Spec<'_, T>
where
    T: AsRef<str>,
{
    fn normalizes_to(&self, expected: &str) {
        let output = paste(self.subject.as_ref()).html();
        if output != expected {
            AssertionFailure::from_spec(self)
                .with_expected(String::from(expected))
                .with_actual(output)
                .fail();
        }
    }
}

fn paste(html: &str) -> NormalizedPaste {
    normalize_paste(&ClipboardData::from_html(html), &PasteOptions::default())
}

fn word_document(fragment: &str) -> String {
    formatdoc! {r#"
        <html xmlns:o="urn:schemas-microsoft-com:office:office"
        xmlns:w="urn:schemas-microsoft-com:office:word"
        xmlns="http://www.w3.org/TR/REC-html40">
        <head>
        <meta http-equiv=Content-Type content="text/html; charset=utf-8">
        <meta name=ProgId content=Word.Document>
        <style>p.MsoNormal {{ margin: 0in; }}</style>
        </head>
        <body lang=EN-US>
        <!--StartFragment-->{fragment}<!--EndFragment-->
        </body>
        </html>"#}
}

fn word_item(class: &str, level: usize, bullet: &str, text: &str) -> String {
    format!(
        r#"<p class={class} style='margin-left:{margin}in;text-indent:-.25in;mso-list:l0 level{level} lfo1'><![if !supportLists]><span style='font-family:Symbol'><span style='mso-list:Ignore'>{bullet}<span style='font:7.0pt "Times New Roman"'>&nbsp;&nbsp;&nbsp; </span></span></span><![endif]>{text}</p>"#,
        margin = level as f32 * 0.5,
    )
}

fn online_item(list: ListType, level: usize, attrs: &str, text: &str) -> String {
    let class = match list {
        ListType::Ordered => "NumberListStyle1",
        ListType::Unordered => "BulletListStyle1",
    };
    let tag = list.tag();
    format!(
        r#"<div class="ListContainerWrapper SCXW1 BCX0"><{tag} class="{class} SCXW1 BCX0" role="list"><li class="OutlineElement Ltr SCXW1 BCX0" data-aria-level="{level}" {attrs}><p class="Paragraph SCXW1 BCX0"><span class="TextRun SCXW1 BCX0">{text}</span></p></li></{tag}></div>"#
    )
}

#[test]
fn word_lists_are_rebuilt_from_a_clipboard_document() {
    let fragment = [
        word_item("MsoListParagraphCxSpFirst", 1, "·", "First"),
        word_item("MsoListParagraphCxSpMiddle", 2, "o", "Nested"),
        word_item("MsoListParagraphCxSpLast", 1, "·", "Second"),
        String::from("<p class=MsoNormal>After</p>"),
    ]
    .join("\n");

    let result = paste(&word_document(&fragment));

    assert_eq!(result.source, PasteSource::WordDesktop);
    assert_eq!(result.lists_converted.bullets, 3);
    assert_eq!(
        result.html(),
        "<ul><li>First<ul><li>Nested</li></ul></li><li>Second</li></ul>\n\n\n<p class=\"MsoNormal\">After</p>"
    );
}

#[test]
fn a_single_word_bullet_becomes_a_list() {
    let html = r#"<p style="mso-list:l1 level1 lfo1"><span style="mso-list:Ignore">·<span>&nbsp;</span></span>Hello</p>"#;
    assert_that!(word_document(html)).normalizes_to("<ul><li>Hello</li></ul>");
}

#[test]
fn word_numbering_is_told_apart_from_bullets() {
    let numbered = [
        word_item("MsoListParagraphCxSpFirst", 1, "1.", "One"),
        word_item("MsoListParagraphCxSpLast", 1, "2.", "Two"),
    ]
    .concat();
    let single = word_item("MsoListParagraph", 1, "o", "Only");

    assert_that!(word_document(&numbered))
        .normalizes_to("<ol><li>One</li><li>Two</li></ol>");
    assert_that!(word_document(&single)).normalizes_to("<ul><li>Only</li></ul>");
}

#[test]
fn word_numbering_broken_by_other_content_is_not_converted() {
    let fragment = [
        word_item("MsoListParagraphCxSpFirst", 1, "1.", "One"),
        String::from("<p class=MsoNormal>Between</p>"),
        word_item("MsoListParagraphCxSpLast", 1, "2.", "Two"),
    ]
    .concat();

    let result = paste(&word_document(&fragment));

    assert_eq!(result.source, PasteSource::WordDesktop);
    assert!(!result.lists_converted.any());
    let html = result.html();
    assert!(!html.contains("<ol>"));
    assert_eq!(html.matches("mso-list:l0 level1 lfo1").count(), 2);
}

#[test]
fn online_wrappers_become_one_list() {
    let html: String = ["A", "B", "C"]
        .iter()
        .map(|x| {
            format!(
                r#"<div class="ListContainerWrapper"><ul class="BulletListStyle1"><li data-aria-level="1">{x}</li></ul></div>"#
            )
        })
        .collect();
    let mut dom = parse_fragment_lossy(&html);
    let options = PasteOptions::default();

    convert_pasted_content_from_word_online(&mut dom, &options);

    assert_eq!(
        dom.to_html(),
        r#"<ul><li data-aria-level="1">A</li><li data-aria-level="1">B</li><li data-aria-level="1">C</li></ul>"#
    );
}

#[test]
fn online_levels_nest_through_the_pipeline() {
    let html = [
        online_item(ListType::Unordered, 1, "", "A"),
        online_item(ListType::Unordered, 2, "", "B"),
        online_item(ListType::Unordered, 3, "", "C"),
    ]
    .concat();

    let result = paste(&html);

    assert_eq!(result.source, PasteSource::WebAppComponents);
    let dom = parse_fragment_lossy(&result.html());
    let root = dom.root();
    assert_eq!(dom.children(root).len(), 1);
    let text: Vec<String> = dom
        .find_descendants(root, |d, h| d.has_tag(h, "li"))
        .into_iter()
        .map(|li| {
            let depth = std::iter::successors(Some(li), |h| dom.parent(*h))
                .filter(|h| dom.has_tag(*h, "ul"))
                .count();
            format!("{depth}:{}", dom.text_content(li))
        })
        .collect();
    assert_eq!(text, vec!["1:ABC", "2:BC", "3:C"]);
}

#[test]
fn online_numbering_keeps_its_start() {
    let html = indoc! {r#"
        <div class="ListContainerWrapper"><ol class="NumberListStyle1" start="5" role="list"><li class="OutlineElement" data-aria-level="1" data-aria-posinset="5">Five</li></ol></div>"#};

    let result = paste(html);

    assert_eq!(result.source, PasteSource::WebAppComponents);
    let reparsed = parse_fragment_lossy(&result.html());
    let ol = reparsed.children(reparsed.root())[0];
    let start = reparsed
        .element(ol)
        .and_then(|e| e.get_attr("start"))
        .and_then(|s| s.parse::<u32>().ok());
    assert_eq!(start, Some(5));
}

#[test]
fn online_marker_glyphs_are_reused_only_when_safe() {
    let html = [
        online_item(ListType::Unordered, 1, r#"data-leveltext="▫""#, "safe"),
        online_item(ListType::Unordered, 1, r#"data-leveltext="&#1;""#, "control"),
        online_item(ListType::Unordered, 1, r#"data-leveltext="X""#, "odd"),
    ]
    .concat();

    let output = paste(&html).html();

    let dom = parse_fragment_lossy(&output);
    let styles: Vec<Option<String>> = dom
        .find_descendants(dom.root(), |d, h| d.has_tag(h, "li"))
        .into_iter()
        .map(|li| {
            dom.element(li)
                .and_then(|e| e.style_value("list-style-type"))
        })
        .collect();
    assert_eq!(styles, vec![Some(String::from("\"▫ \"")), None, None]);
}

#[test]
fn online_table_handles_are_removed() {
    let html = indoc! {r#"
        <div class="OutlineElement"><table><tbody><tr><td><div class="TableCellLeftBorderHandle"></div><div class="TableHoverRowHandle"></div><p>cell</p></td></tr></tbody></table></div>"#};
    assert_that!(html).normalizes_to(
        r#"<div class="OutlineElement"><table><tbody><tr><td><p>cell</p></td></tr></tbody></table></div>"#,
    );
}

#[test]
fn well_formed_lists_survive_the_online_reconstructor() {
    let html = indoc! {r#"
        <ul><li>A<ul><li>B<ol start="2"><li>C</li></ol></li></ul></li></ul>
        <p>text</p>"#};
    let mut dom = parse_fragment_lossy(html);
    let options = PasteOptions::default();

    convert_pasted_content_from_word_online(&mut dom, &options);
    let once = dom.to_html();
    convert_pasted_content_from_word_online(&mut dom, &options);

    assert_eq!(once, html);
    assert_eq!(dom.to_html(), html);
}

#[test]
fn word_signals_win_over_online_markup() {
    let html = formatdoc! {r#"
        <html><head><meta name=ProgId content=Word.Document></head>
        <body>{}</body></html>"#,
        online_item(ListType::Unordered, 1, "", "A")
    };
    assert_eq!(paste(&html).source, PasteSource::WordDesktop);
}

#[test]
fn excel_and_powerpoint_are_classified_but_left_alone() {
    let excel = indoc! {r#"
        <html xmlns:x="urn:schemas-microsoft-com:office:excel">
        <head><meta name=ProgId content=Excel.Sheet></head>
        <body><table><tbody><tr><td>1</td></tr></tbody></table></body></html>"#};
    let excel_online = indoc! {r#"
        <html><head><meta name=ProgId content=Excel.Sheet></head>
        <body><table><tbody><tr><td>1</td></tr></tbody></table></body></html>"#};
    let powerpoint = indoc! {r#"
        <html><head><meta name=ProgId content=PowerPoint.Slide></head>
        <body><p>slide</p></body></html>"#};

    assert_eq!(paste(excel).source, PasteSource::ExcelDesktop);
    assert_eq!(paste(excel_online).source, PasteSource::ExcelOnline);
    let slide = paste(powerpoint);
    assert_eq!(slide.source, PasteSource::PowerPointDesktop);
    assert_eq!(slide.html(), "<p>slide</p>");
}

#[test]
fn unknown_sources_pass_through_unchanged() {
    let html = r#"<p>Hello <b>world</b></p><ul><li>x</li></ul>"#;
    let result = paste(html);
    assert_eq!(result.source, PasteSource::Default);
    assert_eq!(result.html(), html);
}
