use http::Method;
use sapcc_common::api::subaccount::subaccount_path;
use tracing::Instrument as _;
use tracing::info;
use tracing::info_span;

use super::SubaccountError;
use super::SubaccountReconciler;
use super::state::SubaccountState;
use crate::transport::NO_BODY;
use crate::transport::Transport;
use crate::transport::call_empty;

impl<T: Transport> SubaccountReconciler<T> {
    /// Removes the subaccount. There is no tunnel, trust or renewal step.
    pub async fn delete(&self, state: &SubaccountState) -> Result<(), SubaccountError> {
        let identity = state.identity();
        let span = info_span!("Delete", %identity);
        async {
            let () = call_empty(
                self.transport.as_ref(),
                Method::DELETE,
                &subaccount_path(&identity),
                NO_BODY,
            )
            .await?;
            info!("Deleted the subaccount");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
