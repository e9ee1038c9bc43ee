//! Translation from wire-library status to [`MqttError`].
//!
//! | wire status                           | client error      |
//! |---------------------------------------|-------------------|
//! | success                               | `Ok`              |
//! | `BadParameter`                        | `BadParameter`    |
//! | `NoMemory`                            | `NoMemory`        |
//! | `SendFailed`, `RecvFailed`            | `NetworkError`    |
//! | `BadResponse`                         | `BadResponse`     |
//! | `ServerRefused`                       | `ServerRefused`   |
//! | `NoDataAvailable`, `KeepAliveTimeout` | `Timeout`         |
//! | `IllegalState`, `StateCollision`      | `BadResponse`     |
//! | `Unrecognized(_)`                     | `Unknown`         |

use super::error::{MqttError, Result};
use super::wire::{WireResult, WireStatus};

impl From<WireStatus> for MqttError {
    fn from(status: WireStatus) -> Self {
        match status {
            WireStatus::BadParameter => MqttError::BadParameter,
            WireStatus::NoMemory => MqttError::NoMemory,
            WireStatus::SendFailed | WireStatus::RecvFailed => MqttError::NetworkError,
            WireStatus::BadResponse => MqttError::BadResponse,
            WireStatus::ServerRefused => MqttError::ServerRefused,
            WireStatus::NoDataAvailable | WireStatus::KeepAliveTimeout => MqttError::Timeout,
            WireStatus::IllegalState | WireStatus::StateCollision => MqttError::BadResponse,
            WireStatus::Unrecognized(_) => MqttError::Unknown,
        }
    }
}

/// Translate the outcome of a wire-library call.
///
/// Builders and parsers call this on every collaborator result so that raw
/// wire statuses never reach their callers.
///
/// # Examples
///
/// ```rust
/// use libiot_mqtt::mqtt::{MqttError, translate};
/// use libiot_mqtt::mqtt::wire::WireStatus;
///
/// assert_eq!(translate(Ok::<u8, _>(4)), Ok(4));
/// assert_eq!(translate::<()>(Err(WireStatus::RecvFailed)), Err(MqttError::NetworkError));
/// assert_eq!(translate(WireStatus::from_code(42)), Err(MqttError::Unknown));
/// ```
pub fn translate<T>(result: WireResult<T>) -> Result<T> {
    result.map_err(|status| {
        let error = MqttError::from(status);
        debug!("wire status {=u8} translated to {}", status.code(), error);
        error
    })
}
