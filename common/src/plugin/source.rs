use async_trait::async_trait;

use crate::{Device, Result};

#[async_trait]
pub trait DeviceSource: Send + Sync {
    /// Every device known to this source, in the source's own order.
    async fn list_devices(&self) -> Result<Vec<Device>>;
}
