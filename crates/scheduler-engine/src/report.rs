use scheduler_core_types::RequestId;
use scheduler_store::PersistReport;
use serde::Serialize;

/// What a write applied in the cache and what reached storage
///
/// `applied` is the per-field account from the cache (`ReplaceAllReport`,
/// `SessionsReport` or `SettingOutcome`). Write-back failures are recorded in
/// `persist` and logged; they never fail the write itself.
#[derive(Debug, Clone, Serialize)]
pub struct WriteReport<R> {
    pub request_id: RequestId,
    pub applied: R,
    pub persist: PersistReport,
}

impl<R> WriteReport<R> {
    pub fn persisted_cleanly(&self) -> bool {
        self.persist.is_clean()
    }
}
