use crate::structure::Structure;
use chrono::Datelike;
use error::MapError;
use rayon::prelude::*;
use tracing::debug;
use value::{Decimal, FieldDescriptor, FieldKind, Record, Value, parse_datetime};

/// Converts a whole table of middleware rows into native records, rows in
/// parallel on the shared worker pool.
///
/// The schema table is derived once for the whole table, not once per row.
/// Every worker yields a `Result`; only after all rows finished does the
/// first failure (in row order) surface, so a single bad field fails the
/// entire batch and no partial list escapes.
pub fn table_to_records<T, S>(table: &[S]) -> Result<Vec<T>, MapError>
where
    T: Record + Send,
    S: Structure + Sync,
{
    let fields = schema::<T>()?;
    debug!(rows = table.len(), fields = fields.len(), "converting table");

    let rows: Vec<Result<T, MapError>> = table
        .par_iter()
        .map(|row| build_record(&fields, row))
        .collect();
    rows.into_iter().collect()
}

/// Builds one native record from a single middleware structure.
pub fn structure_to_record<T, S>(source: &S) -> Result<T, MapError>
where
    T: Record,
    S: Structure,
{
    let fields = schema::<T>()?;
    build_record(&fields, source)
}

/// Writes a native record into an existing middleware structure, field by
/// field by name. Coercion is left entirely to the structure's setter; the
/// target is mutated in place and never copied.
pub fn record_to_structure<T, S>(record: &T, target: &mut S) -> Result<(), MapError>
where
    T: Record,
    S: Structure,
{
    let fields = schema::<T>()?;
    debug!(fields = fields.len(), "writing record into structure");

    for field in &fields {
        let value = (field.get)(record);
        target.set_value(field.name, value).map_err(|err| {
            if err.is_rejection() {
                MapError::rejected(field.name, err)
            } else {
                MapError::unclassified(field.name, err)
            }
        })?;
    }
    Ok(())
}

fn schema<T: Record>() -> Result<Vec<FieldDescriptor<T>>, MapError> {
    let fields = T::fields();
    for field in &fields {
        if !field.kind.is_mappable() {
            return Err(MapError::unsupported_kind(field.name, &field.kind.to_string()));
        }
    }
    Ok(fields)
}

fn build_record<T, S>(fields: &[FieldDescriptor<T>], row: &S) -> Result<T, MapError>
where
    T: Record,
    S: Structure,
{
    let mut record = T::default();
    for field in fields {
        assign_field(field, row, &mut record)?;
    }
    Ok(record)
}

fn assign_field<T, S>(
    field: &FieldDescriptor<T>,
    row: &S,
    record: &mut T,
) -> Result<(), MapError>
where
    S: Structure,
{
    match field.kind {
        FieldKind::Text => {
            let text = row
                .get_string(field.name)
                .map_err(|err| MapError::conversion(field.name, err))?;
            (field.set)(record, Value::Text(text));
        }
        FieldKind::DateTime => {
            let raw = row
                .get_value(field.name)
                .map_err(|err| MapError::conversion(field.name, err))?;
            // unparsable dates and the middleware's "no date" sentinel
            // (year 1900 and before) leave the field at its default
            if let Some(datetime) = parse_datetime(&raw.to_string())
                && datetime.year() > 1900
            {
                (field.set)(record, Value::DateTime(datetime));
            }
        }
        FieldKind::Decimal => {
            let raw = row
                .get_value(field.name)
                .map_err(|err| MapError::conversion(field.name, err))?;
            let decimal: Decimal = raw
                .to_string()
                .parse()
                .map_err(|err: value::ParseDecimalError| MapError::conversion(field.name, err))?;
            (field.set)(record, Value::Decimal(decimal));
        }
        FieldKind::Integer | FieldKind::Bool => {
            return Err(MapError::unsupported_kind(field.name, &field.kind.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::map::{record_to_structure, structure_to_record, table_to_records};
    use crate::structure::{MemoryStructure, Structure, StructureError};
    use chrono::NaiveDateTime;
    use error::MapError;
    use std::collections::BTreeSet;
    use value::{Decimal, Record, Value};

    #[derive(Debug, Default, PartialEq, Record)]
    struct Item {
        #[field(rename = "NAME")]
        name: String,
        #[field(rename = "AMOUNT")]
        amount: Decimal,
        #[field(rename = "CREATED")]
        created: Option<NaiveDateTime>,
    }

    #[derive(Debug, Default, PartialEq, Record)]
    struct Priced {
        #[field(rename = "NAME")]
        name: String,
        #[field(rename = "AMOUNT")]
        amount: Decimal,
    }

    #[derive(Debug, Default, Record)]
    struct Flagged {
        active: bool,
    }

    fn item_row(name: &str, amount: &str, created: &str) -> MemoryStructure {
        MemoryStructure::from_pairs([
            ("NAME", Value::text(name)),
            ("AMOUNT", Value::text(amount)),
            ("CREATED", Value::text(created)),
        ])
    }

    #[test]
    fn structure_to_record_reads_every_field() {
        let item: Item = structure_to_record(&item_row("Widget", "12.5", "2021-05-04")).unwrap();

        assert_eq!(item.name, "Widget");
        assert_eq!(item.amount, "12.5".parse().unwrap());
        assert_eq!(
            item.created.unwrap().to_string(),
            "2021-05-04 00:00:00"
        );
    }

    #[test]
    fn round_trip_reproduces_the_record() {
        let original = Priced {
            name: String::from("Widget"),
            amount: "12.5".parse().unwrap(),
        };

        let mut row = MemoryStructure::new(["NAME", "AMOUNT"]);
        record_to_structure(&original, &mut row).unwrap();
        let copied: Priced = structure_to_record(&row).unwrap();

        assert_eq!(copied, original);
    }

    #[test]
    fn date_sentinel_stays_default() {
        for created in ["1899-01-01", "1900-12-31", "not-a-date", ""] {
            let item: Item =
                structure_to_record(&item_row("Widget", "1", created)).unwrap();
            assert_eq!(item.created, None, "created `{}` must stay unset", created);
        }

        let item: Item = structure_to_record(&item_row("Widget", "1", "1901-01-01")).unwrap();
        assert!(item.created.is_some());
    }

    #[test]
    fn decimal_failure_names_the_field() {
        let result: Result<Item, _> =
            structure_to_record(&item_row("Widget", "not-a-number", "2021-05-04"));

        let err = result.unwrap_err();
        assert!(matches!(err, MapError::Conversion { .. }));
        assert!(err.to_string().contains("AMOUNT"));
    }

    #[test]
    fn missing_source_field_names_the_field() {
        let row = MemoryStructure::from_pairs([("NAME", Value::text("Widget"))]);
        let err = structure_to_record::<Item, _>(&row).unwrap_err();

        assert!(matches!(err, MapError::Conversion { .. }));
        assert!(err.to_string().contains("AMOUNT") || err.to_string().contains("CREATED"));
    }

    #[test]
    fn bulk_returns_one_record_per_row() {
        let table: Vec<MemoryStructure> = (0..100)
            .map(|i| item_row(&format!("row-{}", i), &format!("{}.5", i), "2021-05-04"))
            .collect();

        let items: Vec<Item> = table_to_records(&table).unwrap();

        assert_eq!(items.len(), table.len());
        let names: BTreeSet<String> = items.iter().map(|item| item.name.clone()).collect();
        assert_eq!(names.len(), table.len());
        for i in 0..table.len() {
            assert!(names.contains(&format!("row-{}", i)));
        }
    }

    #[test]
    fn bulk_fails_whole_batch_on_one_bad_row() {
        let mut table: Vec<MemoryStructure> = (0..50)
            .map(|i| item_row(&format!("row-{}", i), "1.5", "2021-05-04"))
            .collect();
        table[31] = item_row("row-31", "not-a-number", "2021-05-04");

        let err = table_to_records::<Item, _>(&table).unwrap_err();
        assert!(matches!(err, MapError::Conversion { .. }));
        assert!(err.to_string().contains("AMOUNT"));
    }

    #[test]
    fn bulk_of_empty_table_is_empty() {
        let items: Vec<Item> = table_to_records(&[] as &[MemoryStructure]).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn unsupported_kind_is_rejected_before_any_row() {
        let table = vec![MemoryStructure::from_pairs([("active", Value::bool(true))])];

        let bulk = table_to_records::<Flagged, _>(&table).unwrap_err();
        let single = structure_to_record::<Flagged, _>(&table[0]).unwrap_err();
        let mut target = MemoryStructure::new(["active"]);
        let write = record_to_structure(&Flagged::default(), &mut target).unwrap_err();

        for err in [bulk, single, write] {
            assert!(matches!(err, MapError::UnsupportedKind { .. }));
            assert!(err.to_string().contains("active"));
            assert!(err.to_string().contains("bool"));
        }
    }

    #[test]
    fn record_to_structure_writes_in_place() {
        let item = Item {
            name: String::from("Widget"),
            amount: "12.5".parse().unwrap(),
            created: None,
        };
        let mut row = MemoryStructure::new(["NAME", "AMOUNT", "CREATED"]);

        record_to_structure(&item, &mut row).unwrap();

        assert_eq!(row.get_value("NAME"), Ok(Value::text("Widget")));
        assert_eq!(row.get_value("AMOUNT"), Ok(Value::decimal(125, 1)));
        assert_eq!(row.get_value("CREATED"), Ok(Value::Null));
    }

    #[test]
    fn rejected_write_names_the_field() {
        let item = Priced {
            name: String::from("Widget"),
            amount: "1".parse().unwrap(),
        };
        let mut row = MemoryStructure::new(["NAME"]);

        let err = record_to_structure(&item, &mut row).unwrap_err();
        assert!(matches!(err, MapError::Rejected { .. }));
        assert!(err.to_string().contains("AMOUNT"));
    }

    #[test]
    fn unknown_write_failure_is_unclassified() {
        struct Broken;

        impl Structure for Broken {
            fn get_value(&self, field: &str) -> Result<Value, StructureError> {
                Err(StructureError::Other(format!("read {}", field)))
            }

            fn get_string(&self, field: &str) -> Result<String, StructureError> {
                Err(StructureError::Other(format!("read {}", field)))
            }

            fn set_value(&mut self, _field: &str, _value: Value) -> Result<(), StructureError> {
                Err(StructureError::Other(String::from("backend gone")))
            }
        }

        let item = Priced::default();
        let err = record_to_structure(&item, &mut Broken).unwrap_err();
        assert!(matches!(err, MapError::Unclassified { .. }));
        assert!(err.to_string().contains("NAME"));

        let read = structure_to_record::<Priced, _>(&Broken).unwrap_err();
        assert!(matches!(read, MapError::Conversion { .. }));
    }
}
