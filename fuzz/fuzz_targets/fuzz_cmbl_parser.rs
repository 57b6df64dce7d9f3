#![no_main]

use cmbl2csv::cmbl::{parse, Precision};
use cmbl2csv::writer::CsvWriter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any input must either parse or fail with an error; it must never panic.
    for precision in [Precision::Single, Precision::Double] {
        if let Ok(document) = parse(data, precision) {
            // Whatever survived parsing has to serialize too.
            let writer = CsvWriter::default();
            for dataset in &document.datasets {
                let mut out = Vec::new();
                let _ = writer.write_dataset_to(&mut out, dataset);
            }
        }
    }
});
