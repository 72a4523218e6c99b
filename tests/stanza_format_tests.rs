use serde_stanza::{
    normalize_field_name, Error, Indent, Reader, ReaderOptions, Record, Writer, WriterOptions,
};

fn read_all(input: &str) -> Vec<Record> {
    Reader::new(input.as_bytes()).into_records().unwrap()
}

fn write_all(records: &[Record], options: WriterOptions) -> String {
    let mut writer = Writer::with_options(Vec::new(), options).unwrap();
    writer.write_all(records).unwrap();
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

#[test]
fn test_comments_blanks_and_delimiters_only() {
    assert!(read_all("").is_empty());
    assert!(read_all("%%\n# nothing here\n\n%%\n\n").is_empty());
    assert!(read_all("   \n\t\n").is_empty());
}

#[test]
fn test_any_percent_line_is_a_delimiter() {
    let records = read_all("a: 1\n%% end of first\nb: 2\n%\n");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("b"), Some("2"));
}

#[test]
fn test_crlf_line_endings() {
    let records = read_all("Name: Jujuy\r\nCategory: Province\r\n%%\r\nName: Salta\r\n");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("category"), Some("Province"));
    assert_eq!(records[1].get("name"), Some("Salta"));
}

#[test]
fn test_lone_carriage_return_does_not_end_line() {
    let records = read_all("a: x\ry\nb: 2\n");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("a"), Some("x y"));
    assert_eq!(records[0].get("b"), Some("2"));
}

#[test]
fn test_value_whitespace_is_collapsed() {
    let records = read_all("name:    Santiago \t del   Estero   \n");
    assert_eq!(records[0].get("name"), Some("Santiago del Estero"));
}

#[test]
fn test_name_normalization_on_read() {
    let records = read_all("  Postal   Code : 4000\n");
    assert_eq!(records[0].keys().collect::<Vec<_>>(), ["postal-code"]);
    assert_eq!(normalize_field_name("ISO 3166"), "iso-3166");
    assert_eq!(normalize_field_name("Name"), "name");
}

#[test]
fn test_comment_inside_value_is_dropped() {
    let records = read_all("anthem: Oíd mortales\n# a comment\n  el grito sagrado\n%%\n");
    assert_eq!(records[0].get("anthem"), Some("Oíd mortales el grito sagrado"));
}

#[test]
fn test_value_starting_on_next_line() {
    let records = read_all("anthem:\n\tfirst line\n\tsecond line\n");
    assert_eq!(records[0].get("anthem"), Some("first line second line"));
}

#[test]
fn test_empty_fields_dropped_by_default() {
    let records = read_all("name: Formosa\nanthem:\ncapital\n%%\n");
    assert_eq!(records[0].len(), 1);
}

#[test]
fn test_duplicate_in_other_spelling() {
    let mut reader = Reader::new("Postal Code: 1\npostal  code: 2\n".as_bytes());
    match reader.decode_next() {
        Err(Error::DuplicateField { line, field }) => {
            assert_eq!(line, 2);
            assert_eq!(field, "postal-code");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_invalid_utf8_reports_line() {
    let mut reader = Reader::new(&b"a: 1\nb: \xFF\n"[..]);
    let err = reader.decode_next().unwrap_err();
    assert!(matches!(err, Error::InvalidUtf8 { line: 2 }));
    println!("{}", err);
}

#[test]
fn test_output_field_validation() {
    let mut writer = Writer::new(Vec::new());
    for bad in ["", "Name", "postal code", "a:b"] {
        let err = writer.set_output_fields([bad]).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldName { .. }), "{:?}", bad);
    }
    writer.set_output_fields(["name", "capital", "name"]).unwrap();
    assert_eq!(writer.output_fields(), ["name", "capital"]);
}

#[test]
fn test_unlisted_fields_are_not_written() {
    let mut record = Record::new();
    record.insert("name", "Misiones");
    record.insert("capital", "Posadas");
    let out = write_all(&[record], WriterOptions::new().with_fields(["capital"]));
    assert_eq!(out, "capital: Posadas\n%%\n");
}

#[test]
fn test_space_indent_for_folded_values() {
    let mut record = Record::new();
    record.insert("anthem", "line one\nline two");
    let out = write_all(&[record], WriterOptions::new().with_indent(Indent::Space));
    assert_eq!(out, "anthem: line one\n line two\n%%\n");
}

#[test]
fn test_force_empty_toggled_between_records() {
    let mut record = Record::new();
    record.insert("name", "Neuquén");
    let mut writer = Writer::new(Vec::new());
    writer.set_output_fields(["name", "capital"]).unwrap();
    writer.write(&record).unwrap();
    writer.force_empty = true;
    writer.write(&record).unwrap();
    let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(out, "name: Neuquén\n%%\nname: Neuquén\ncapital\n%%\n");
}

#[test]
fn test_reader_line_tracking() {
    let mut reader = Reader::new("a: 1\n%%\nb: 2\n%%\n".as_bytes());
    assert_eq!(reader.line(), 1);
    reader.decode_next().unwrap();
    assert_eq!(reader.line(), 3);
}

#[test]
fn test_indented_comment_and_delimiter_lines() {
    let records = read_all("  #tag: x\nname: Arg\n%%\n %x: 1\ncapital: BA\n");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].keys().collect::<Vec<_>>(), ["name"]);
    assert_eq!(records[1].keys().collect::<Vec<_>>(), ["capital"]);

    let keep = ReaderOptions::new().with_keep_empty(true);
    let kept = Reader::with_options("  # just a note\nname: Arg\n%%\n".as_bytes(), keep)
        .into_records()
        .unwrap();
    assert_eq!(kept[0].keys().collect::<Vec<_>>(), ["name"]);
}

#[test]
fn test_indented_lines_survive_write_then_read() {
    let input = "  #tag: x\n\tname: Arg\n%%\n %x: 1\n  capital: BA\n%%\n";
    let records = read_all(input);
    let out = write_all(&records, WriterOptions::default());
    assert_eq!(out, "name: Arg\n%%\ncapital: BA\n%%\n");
    assert_eq!(read_all(&out), records);
}

#[test]
fn test_names_that_would_read_as_comments_are_not_written() {
    let mut record = Record::new();
    record.insert("#tag", "x");
    record.insert("name", "Arg");
    let mut writer = Writer::new(Vec::new());
    let err = writer.write(&record).unwrap_err();
    assert!(matches!(err, Error::InvalidFieldName { .. }));
    println!("{}", err);
    assert!(writer.into_inner().unwrap().is_empty());
}

#[test]
fn test_skip_after_encoding_error_mid_line() {
    let input = &b"a: 1\nb: \xFF%% not a delimiter\nc: 3\n%%\nd: 4\n%%\n"[..];
    let mut reader = Reader::new(input);
    let err = reader.decode_next().unwrap_err();
    assert!(matches!(err, Error::InvalidUtf8 { line: 2 }));

    assert!(reader.skip_record().unwrap());
    let record = reader.decode_next().unwrap().unwrap();
    assert_eq!(record.keys().collect::<Vec<_>>(), ["d"]);
    assert!(reader.decode_next().unwrap().is_none());
}
