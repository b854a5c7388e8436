//! CSV import/export of labeled datasets.
//!
//! Columns: `age, medical_visits_frequency, physical_activity_level, category`,
//! where `category` holds the category name (e.g. `CHRONIC`).

use crate::dataset::{LabeledDataset, LabeledSample};
use crate::error::Result;
use crate::policy::{Category, FeatureVector};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct CsvRecord {
    age: f64,
    medical_visits_frequency: f64,
    physical_activity_level: f64,
    category: Category,
}

impl From<&LabeledSample> for CsvRecord {
    fn from(s: &LabeledSample) -> Self {
        Self {
            age: s.features.age,
            medical_visits_frequency: s.features.visit_frequency,
            physical_activity_level: s.features.activity_level,
            category: s.category,
        }
    }
}

impl From<CsvRecord> for LabeledSample {
    fn from(r: CsvRecord) -> Self {
        LabeledSample::new(
            FeatureVector::new(r.age, r.medical_visits_frequency, r.physical_activity_level),
            r.category,
        )
    }
}

pub fn write_csv<W: Write>(dataset: &LabeledDataset, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for sample in dataset {
        wtr.serialize(CsvRecord::from(sample))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_csv<R: Read>(reader: R) -> Result<LabeledDataset> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut samples = Vec::new();
    for record in rdr.deserialize::<CsvRecord>() {
        samples.push(record?.into());
    }
    Ok(LabeledDataset::new(samples))
}

pub fn write_csv_file<P: AsRef<Path>>(dataset: &LabeledDataset, path: P) -> Result<()> {
    write_csv(dataset, std::fs::File::create(path)?)
}

pub fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<LabeledDataset> {
    read_csv(std::io::BufReader::new(std::fs::File::open(path)?))
}
