/// Builds a [`Record`](crate::Record) from `name => value` pairs.
///
/// Names are normalized on insert, so later pairs overwrite earlier ones
/// that normalize to the same name.
///
/// ```rust
/// use serde_stanza::record;
///
/// let record = record! { "Name" => "Arg", "capital" => "BA" };
/// assert_eq!(record.get("name"), Some("Arg"));
/// assert!(record! {}.is_empty());
/// ```
#[macro_export]
macro_rules! record {
    // Handle empty record
    () => {
        $crate::Record::new()
    };

    // Handle name => value pairs
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert($name, $value);
        )+
        record
    }};
}

#[cfg(test)]
mod tests {
    use crate::Record;

    #[test]
    fn test_record_macro_empty() {
        assert_eq!(record!(), Record::new());
        assert_eq!(record! {}, Record::new());
    }

    #[test]
    fn test_record_macro_pairs() {
        let record = record! {
            "ISO3166-2" => "AR-T",
            "Name" => String::from("Tucumán"),
        };
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("iso3166-2"), Some("AR-T"));
        assert_eq!(record.get("name"), Some("Tucumán"));
    }

    #[test]
    fn test_record_macro_keeps_insertion_order() {
        let record = record! { "b" => "2", "a" => "1" };
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
