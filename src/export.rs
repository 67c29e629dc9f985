//! CSV rendering of expense lists and settlement plans.
//!
//! Everything is written to in-memory buffers; serving the result is the
//! HTTP layer's job.

use csv::Writer;

use crate::errors::ExportError;
use crate::schemas::{Event, Transfer};

/// One row per expense across the given events. Beneficiaries are joined
/// with `;` inside a single column, amounts rendered with two decimals.
pub fn expenses_csv(events: &[Event]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record([
        "event_id",
        "event_name",
        "expense_id",
        "created",
        "description",
        "amount",
        "payer",
        "beneficiaries",
    ])?;
    for event in events {
        for expense in &event.expenses {
            writer.write_record([
                event.id.as_str(),
                event.name.as_str(),
                &expense.id.to_string(),
                &expense.created.to_rfc3339(),
                expense.description.as_str(),
                &expense.amount.to_string(),
                expense.payer.as_str(),
                &expense.beneficiaries.join(";"),
            ])?;
        }
    }
    finish(writer)
}

pub fn settlement_csv(transfers: &[Transfer]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["debtor", "creditor", "amount"])?;
    for transfer in transfers {
        writer.write_record([
            transfer.debtor.as_str(),
            transfer.creditor.as_str(),
            &transfer.amount.to_string(),
        ])?;
    }
    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ExportError::Buffer(err.to_string()))
}
