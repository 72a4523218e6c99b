use serde_stanza::{record, to_string, Record, Writer};

#[test]
fn test_record_macro_builds_writable_record() {
    let province = record! {
        "ISO3166-2" => "AR-Q",
        "Name" => "Neuquén",
        "Category" => "Province",
    };

    let mut writer = Writer::new(Vec::new());
    writer.write(&province).unwrap();
    let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    println!("{}", out);
    assert_eq!(
        out,
        "category: Province\niso3166-2: AR-Q\nname: Neuquén\n%%\n"
    );
}

#[test]
fn test_record_macro_with_expressions() {
    let code = format!("AR-{}", 'Z');
    let record = record! { "iso3166-2" => code.clone(), "name" => "Santa Cruz".to_string() };
    assert_eq!(record.get("iso3166-2"), Some(code.as_str()));
}

#[test]
fn test_record_macro_later_pair_wins() {
    let record = record! { "Name" => "first", "name" => "second" };
    assert_eq!(record.len(), 1);
    assert_eq!(record.get("name"), Some("second"));
}

#[test]
fn test_record_macro_serializes() {
    let records: Vec<Record> = vec![record! { "a" => "1" }, record! {}, record! { "b" => "2" }];
    assert_eq!(to_string(&records).unwrap(), "a: 1\n%%\nb: 2\n%%\n");
}
