//! CRM column name resolution for built reports.

use std::collections::{HashMap, HashSet};

use super::{SmartisClient, SmartisError};
use crate::domain::{CellKind, Report};

/// Positions `(row, cell)` of every cell sharing a clean id.
type CellRefs = HashMap<String, Vec<(usize, usize)>>;

impl SmartisClient {
    /// Fill in the display names of CRM columns in `report`.
    ///
    /// Custom-field and custom-field-group cells are looked up in one batched
    /// request per kind; a kind with no cells issues no request. Ids the API
    /// does not return keep an empty name.
    ///
    /// Errors:
    /// - [`SmartisError::MissingCredential`] without a CRM token (no request is made),
    /// - [`SmartisError::MalformedReport`] if a CRM column has a non-numeric id,
    /// - any error of the lookup requests. Names written by a lookup that
    ///   already succeeded are kept, but the report is not marked as resolved.
    pub async fn resolve_column_names(&self, report: &mut Report) -> Result<(), SmartisError> {
        self.require_crm_token()?;

        let (fields, groups) = collect_crm_cells(report);

        if !fields.is_empty() {
            let ids = parse_clean_ids(&fields)?;
            tracing::debug!(
                metric = report.metric(),
                ids = ids.len(),
                "resolving CRM custom field names"
            );
            let found = self.get_crm_custom_fields(&ids).await?;
            write_names(
                report,
                &fields,
                found.into_iter().map(|field| (field.id, field.title)),
            );
        }

        if !groups.is_empty() {
            let ids = parse_clean_ids(&groups)?;
            tracing::debug!(
                metric = report.metric(),
                ids = ids.len(),
                "resolving CRM custom field group names"
            );
            let found = self.get_crm_custom_field_groups(&ids).await?;
            write_names(
                report,
                &groups,
                found.into_iter().map(|group| (group.id, group.title)),
            );
        }

        report.mark_names_resolved();
        Ok(())
    }
}

fn collect_crm_cells(report: &Report) -> (CellRefs, CellRefs) {
    let mut fields = CellRefs::new();
    let mut groups = CellRefs::new();

    for (row_idx, row) in report.rows().iter().enumerate() {
        for (cell_idx, cell) in row.cells().iter().enumerate() {
            let target = match cell.kind() {
                CellKind::CustomField => &mut fields,
                CellKind::CustomFieldGroup => &mut groups,
                CellKind::SystemField => continue,
            };
            let clean_id = cell.clean_id().unwrap_or_default();
            target
                .entry(clean_id.to_owned())
                .or_default()
                .push((row_idx, cell_idx));
        }
    }

    (fields, groups)
}

fn parse_clean_ids(refs: &CellRefs) -> Result<Vec<i64>, SmartisError> {
    let mut ids = refs
        .keys()
        .map(|id| {
            id.parse::<i64>().map_err(|_| {
                SmartisError::MalformedReport(format!("CRM column id `{id}` is not numeric"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    ids.sort_unstable();
    Ok(ids)
}

/// Write titles onto matching cells and return how many ids stay unnamed.
fn write_names(
    report: &mut Report,
    refs: &CellRefs,
    titles: impl IntoIterator<Item = (i64, String)>,
) -> usize {
    let mut resolved = HashSet::new();
    let rows = report.rows_mut();

    for (id, title) in titles {
        let Some(positions) = refs.get(&id.to_string()) else {
            continue;
        };
        for &(row_idx, cell_idx) in positions {
            rows[row_idx].cells_mut()[cell_idx].set_name(title.as_str());
        }
        resolved.insert(id);
    }

    let unresolved = refs.len() - resolved.len();
    if unresolved > 0 {
        tracing::warn!(
            metric = report.metric(),
            requested = refs.len(),
            unresolved,
            "some CRM columns were not returned and stay unnamed"
        );
    }
    unresolved
}
