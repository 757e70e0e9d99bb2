use super::*;
use crate::element::{CoordinatesMetadata, ElementMetadata, RegexMetadata, RegexMetadataMap};
use std::sync::Arc;

fn options(builder: ChunkingOptionsBuilder) -> ChunkingOptions {
    builder.build().unwrap()
}

fn no_combining() -> ChunkingOptions {
    options(ChunkingOptions::builder().combine_text_under_n_chars(0))
}

fn texts(chunks: &[Chunk]) -> Vec<&str> {
    chunks.iter().map(Chunk::text).collect()
}

fn regex(name: &str, matches: Vec<RegexMetadata>) -> RegexMetadataMap {
    RegexMetadataMap::from([(name.to_string(), matches)])
}

fn three_days() -> Vec<Element> {
    vec![
        Element::title("A Great Day"),
        Element::text("Today is a great day."),
        Element::text("It is sunny outside."),
        Element::table("Heading\nCell text"),
        Element::title("An Okay Day"),
        Element::text("Today is an okay day."),
        Element::text("It is rainy outside."),
        Element::title("A Bad Day"),
        Element::text("Today is a bad day.").with_metadata(ElementMetadata {
            regex_metadata: Some(regex("a", vec![RegexMetadata::new("A", 0, 1)])),
            ..Default::default()
        }),
        Element::text("It is storming outside."),
        Element::check_box(),
    ]
}

fn lorem_ipsum_with_regex() -> Vec<Element> {
    vec![
        Element::title("Lorem Ipsum").with_metadata(ElementMetadata {
            regex_metadata: Some(regex("ipsum", vec![RegexMetadata::new("Ipsum", 6, 11)])),
            ..Default::default()
        }),
        Element::text("Lorem ipsum dolor sit amet consectetur adipiscing elit.").with_metadata(
            ElementMetadata {
                regex_metadata: Some(RegexMetadataMap::from([
                    ("dolor".to_string(), vec![RegexMetadata::new("dolor", 12, 17)]),
                    ("ipsum".to_string(), vec![RegexMetadata::new("ipsum", 6, 11)]),
                ])),
                ..Default::default()
            },
        ),
        Element::text("In rhoncus ipsum sed lectus porta volutpat.").with_metadata(
            ElementMetadata {
                regex_metadata: Some(regex("ipsum", vec![RegexMetadata::new("ipsum", 11, 16)])),
                ..Default::default()
            },
        ),
    ]
}

#[test]
fn test_chunk_by_title() {
    let mut elements = three_days();
    elements[0].metadata.emphasized_text_contents = Some(vec!["Day".to_string()]);
    elements[1].metadata.emphasized_text_contents = Some(vec!["day".to_string()]);

    let chunks = chunk_by_title(elements, &no_combining());

    assert_eq!(
        chunks,
        vec![
            Chunk::CompositeElement {
                text: "A Great Day\n\nToday is a great day.\n\nIt is sunny outside.".to_string(),
                metadata: Arc::new(ElementMetadata {
                    emphasized_text_contents: Some(vec!["Day".to_string(), "day".to_string()]),
                    ..Default::default()
                }),
            },
            Chunk::Table {
                text: "Heading\nCell text".to_string(),
                metadata: ElementMetadata::default(),
            },
            Chunk::CompositeElement {
                text: "An Okay Day\n\nToday is an okay day.\n\nIt is rainy outside.".to_string(),
                metadata: Arc::new(ElementMetadata::default()),
            },
            Chunk::CompositeElement {
                text: "A Bad Day\n\nToday is a bad day.\n\nIt is storming outside.".to_string(),
                metadata: Arc::new(ElementMetadata {
                    regex_metadata: Some(regex("a", vec![RegexMetadata::new("A", 11, 12)])),
                    ..Default::default()
                }),
            },
        ]
    );
}

#[test]
fn test_chunk_by_title_respects_section_change() {
    let mut elements = three_days();
    elements[0].metadata.section = Some("first".to_string());
    elements[1].metadata.section = Some("second".to_string());
    elements[2].metadata.section = Some("second".to_string());

    let chunks = chunk_by_title(elements, &no_combining());

    assert_eq!(
        texts(&chunks),
        vec![
            "A Great Day",
            "Today is a great day.\n\nIt is sunny outside.",
            "Heading\nCell text",
            "An Okay Day\n\nToday is an okay day.\n\nIt is rainy outside.",
            "A Bad Day\n\nToday is a bad day.\n\nIt is storming outside.",
        ]
    );
}

#[test]
fn test_chunk_by_title_separates_by_page_number() {
    let paged = || {
        let mut elements = three_days();
        elements[0].metadata.page_number = Some(1);
        elements[1].metadata.page_number = Some(2);
        elements[2].metadata.page_number = Some(2);
        elements
    };

    let per_page = options(
        ChunkingOptions::builder()
            .multipage_sections(false)
            .combine_text_under_n_chars(0),
    );
    let chunks = chunk_by_title(paged(), &per_page);
    assert_eq!(
        texts(&chunks),
        vec![
            "A Great Day",
            "Today is a great day.\n\nIt is sunny outside.",
            "Heading\nCell text",
            "An Okay Day\n\nToday is an okay day.\n\nIt is rainy outside.",
            "A Bad Day\n\nToday is a bad day.\n\nIt is storming outside.",
        ]
    );

    let chunks = chunk_by_title(paged(), &no_combining());
    assert_eq!(
        texts(&chunks),
        vec![
            "A Great Day\n\nToday is a great day.\n\nIt is sunny outside.",
            "Heading\nCell text",
            "An Okay Day\n\nToday is an okay day.\n\nIt is rainy outside.",
            "A Bad Day\n\nToday is a bad day.\n\nIt is storming outside.",
        ]
    );
    assert_eq!(chunks[0].metadata().page_number, Some(1));
}

#[test]
fn test_regex_metadata_change_does_not_break_chunk() {
    let chunks = chunk_by_title(lorem_ipsum_with_regex(), &ChunkingOptions::default());

    assert_eq!(
        texts(&chunks),
        vec![
            "Lorem Ipsum\n\nLorem ipsum dolor sit amet consectetur adipiscing elit.\n\nIn rhoncus \
             ipsum sed lectus porta volutpat."
        ]
    );
}

#[test]
fn test_regex_metadata_is_consolidated_with_adjusted_offsets() {
    let chunks = chunk_by_title(lorem_ipsum_with_regex(), &ChunkingOptions::default());

    assert_eq!(chunks.len(), 1);
    assert_eq!(
        chunks[0].metadata().regex_metadata,
        Some(RegexMetadataMap::from([
            ("dolor".to_string(), vec![RegexMetadata::new("dolor", 25, 30)]),
            (
                "ipsum".to_string(),
                vec![
                    RegexMetadata::new("Ipsum", 6, 11),
                    RegexMetadata::new("ipsum", 19, 24),
                    RegexMetadata::new("ipsum", 81, 86),
                ]
            ),
        ]))
    );
}

#[test]
fn test_drops_detection_class_prob() {
    let prob = |element: Element, p: f64| {
        element.with_metadata(ElementMetadata {
            detection_class_prob: Some(p),
            ..Default::default()
        })
    };
    let elements = vec![
        prob(Element::title("A Great Day"), 0.5),
        prob(Element::text("Today is a great day."), 0.62),
        prob(Element::text("It is sunny outside."), 0.73),
        prob(Element::title("An Okay Day"), 0.84),
        prob(Element::text("Today is an okay day."), 0.95),
    ];

    let chunks = chunk_by_title(elements, &no_combining());

    assert_eq!(
        texts(&chunks),
        vec![
            "A Great Day\n\nToday is a great day.\n\nIt is sunny outside.",
            "An Okay Day\n\nToday is an okay day.",
        ]
    );
    assert!(chunks
        .iter()
        .all(|c| *c.metadata() == ElementMetadata::default()));
}

#[test]
fn test_drops_coordinates() {
    let at = |element: Element, corner: f64| {
        element.with_metadata(ElementMetadata {
            coordinates: Some(CoordinatesMetadata {
                points: vec![
                    (corner, corner),
                    (corner + 0.1, corner),
                    (corner, corner + 0.1),
                    (corner + 0.1, corner + 0.1),
                ],
                system: Some("PixelSpace".into()),
                layout_width: Some(1700.0),
                layout_height: Some(2200.0),
            }),
            ..Default::default()
        })
    };
    let elements = vec![
        at(Element::title("A Great Day"), 0.1),
        at(Element::text("Today is a great day."), 0.2),
        at(Element::text("It is sunny outside."), 0.3),
        at(Element::title("An Okay Day"), 0.3),
        at(Element::text("Today is an okay day."), 0.4),
    ];

    let chunks = chunk_by_title(elements, &no_combining());

    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.metadata().coordinates.is_none()));
}

#[test]
fn test_considers_separator_length_when_pre_chunking() {
    let elements = vec![
        Element::title("Chunking Priorities"),
        Element::list_item("Divide text into manageable chunks"),
        Element::list_item("Preserve semantic boundaries"),
        Element::list_item("Minimize mid-text chunk-splitting"),
    ];
    // 114 characters of text, 120 once joined

    let chunks = chunk_by_title(elements, &options(ChunkingOptions::builder().max_characters(115)));

    assert_eq!(
        texts(&chunks),
        vec![
            "Chunking Priorities\n\nDivide text into manageable chunks\n\nPreserve semantic \
             boundaries",
            "Minimize mid-text chunk-splitting",
        ]
    );
}

#[test]
fn test_splits_a_large_element_into_multiple_chunks() {
    let elements = vec![
        Element::title("Introduction"),
        Element::text(
            "Lorem ipsum dolor sit amet consectetur adipiscing elit. In rhoncus ipsum sed lectus \
             porta volutpat.",
        ),
    ];

    let chunks = chunk_by_title(elements, &options(ChunkingOptions::builder().max_characters(50)));

    assert_eq!(
        texts(&chunks),
        vec![
            "Introduction",
            "Lorem ipsum dolor sit amet consectetur adipiscing ",
            "elit. In rhoncus ipsum sed lectus porta volutpat.",
        ]
    );
    assert!(matches!(chunks[1], Chunk::CompositeElement { .. }));
}

#[test]
fn test_windows_of_one_oversized_element() {
    let elements = vec![Element::text("x".repeat(100))];

    let chunks = chunk_by_title(elements, &options(ChunkingOptions::builder().max_characters(40)));

    let lengths: Vec<usize> = chunks.iter().map(Chunk::text_length).collect();
    assert_eq!(lengths, vec![40, 40, 20]);
}

#[test]
fn test_zero_new_after_n_chars_puts_each_element_in_its_own_chunk() {
    let elements = vec![
        Element::text("Lorem"),
        Element::text("ipsum"),
        Element::text("dolor"),
    ];

    let chunks = chunk_by_title(
        elements,
        &options(
            ChunkingOptions::builder()
                .max_characters(50)
                .new_after_n_chars(0),
        ),
    );

    assert_eq!(texts(&chunks), vec!["Lorem", "ipsum", "dolor"]);
}

#[test]
fn test_zero_combine_threshold_keeps_sections_apart() {
    let elements = vec![
        Element::title("Lorem"),
        Element::text("ipsum"),
        Element::title("dolor"),
    ];

    let chunks = chunk_by_title(
        elements,
        &options(
            ChunkingOptions::builder()
                .max_characters(50)
                .combine_text_under_n_chars(0),
        ),
    );

    assert_eq!(texts(&chunks), vec!["Lorem\n\nipsum", "dolor"]);
}

#[test]
fn test_small_sections_are_combined_by_default() {
    let elements = vec![
        Element::title("Lorem"),
        Element::text("ipsum"),
        Element::title("dolor"),
        Element::text("sit amet"),
    ];

    let chunks = chunk_by_title(elements, &ChunkingOptions::default());

    assert_eq!(texts(&chunks), vec!["Lorem\n\nipsum\n\ndolor\n\nsit amet"]);
}

#[test]
fn test_empty_input_produces_no_chunks() {
    let chunks = chunk_by_title(Vec::new(), &ChunkingOptions::default());
    assert!(chunks.is_empty());
}

#[test]
fn test_page_break_only_section_yields_empty_chunk() {
    let chunks = chunk_by_title(vec![Element::page_break()], &ChunkingOptions::default());

    assert_eq!(texts(&chunks), vec![""]);
}

#[test]
fn test_chunks_of_one_pre_chunk_share_metadata() {
    let elements = vec![Element::text("y".repeat(30)).with_metadata(ElementMetadata {
        filename: Some("report.pdf".to_string()),
        ..Default::default()
    })];

    let chunks = chunk_by_title(elements, &options(ChunkingOptions::builder().max_characters(10)));

    assert_eq!(chunks.len(), 3);
    let shared: Vec<&Arc<ElementMetadata>> = chunks
        .iter()
        .map(|chunk| match chunk {
            Chunk::CompositeElement { metadata, .. } => metadata,
            other => panic!("expected composite element, got {:?}", other),
        })
        .collect();
    assert!(Arc::ptr_eq(shared[0], shared[1]));
    assert!(Arc::ptr_eq(shared[1], shared[2]));
    assert_eq!(shared[0].filename.as_deref(), Some("report.pdf"));
}

#[test]
fn test_lazy_iteration_matches_eager() {
    let options = options(ChunkingOptions::builder().max_characters(30));

    let eager = chunk_by_title(three_days(), &options);
    let lazy: Vec<Chunk> = iter_chunks_by_title(three_days(), &options).collect();

    assert_eq!(eager, lazy);
}

#[test]
fn test_chunks_serialize_with_type_tag() {
    let chunks = chunk_by_title(
        vec![Element::title("Hello"), Element::table("a | b")],
        &ChunkingOptions::default(),
    );

    let json = serde_json::to_value(&chunks).unwrap();

    assert_eq!(
        json,
        serde_json::json!([
            {"type": "CompositeElement", "text": "Hello", "metadata": {}},
            {"type": "Table", "text": "a | b", "metadata": {}},
        ])
    );
}
