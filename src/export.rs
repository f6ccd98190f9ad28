use crate::domain::model::{Field, Venue};
use crate::utils::error::Result;
use std::io::Write;

/// Writes `venues` as CSV with the store column names as header. Returns the
/// number of rows written.
pub fn venues_to_csv<W: Write>(venues: &[Venue], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["id"];
    header.extend(Field::ALL.iter().map(|f| f.as_str()));
    wtr.write_record(&header)?;

    for venue in venues {
        let mut record = vec![venue.id.clone()];
        record.extend(Field::ALL.iter().map(|f| match f {
            Field::CreatedAt => venue.created_at.to_rfc3339(),
            other => other.display(venue),
        }));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    tracing::debug!("📄 Exported {} venues", venues.len());
    Ok(venues.len())
}
