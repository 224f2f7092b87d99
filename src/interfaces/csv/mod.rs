pub mod event_reader;
pub mod folio_reader;
pub mod report_writer;

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All).flexible(true);
    builder
}
