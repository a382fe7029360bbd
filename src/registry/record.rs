//! Persisted record layout for connections.
//!
//! Every attribute written to the table is produced here, from a single
//! [`Connection`], so that equal identities always map to byte-identical keys.
//!
//! | Attribute      | Value                                              |
//! |----------------|----------------------------------------------------|
//! | `pk`, `sk`     | `WEBSOCKETCONNECTION#<connectionId>#<apiId>#<stage>` |
//! | `GSI1PK`       | `WebSocketConnection`                              |
//! | `GSI1SK`       | same as `pk`                                       |
//! | `region`, `connectionId`, `stage`, `apiId` | connection attributes  |
//! | `domainName`   | only when present                                  |

use serde::Serialize;

use crate::connection::Connection;

/// Entity type name stored in the secondary index partition
pub const ENTITY_TYPE: &str = "WebSocketConnection";
/// Upper-cased entity type used as composite key prefix
pub const ENTITY_KEY_PREFIX: &str = "WEBSOCKETCONNECTION";
const KEY_SEPARATOR: &str = "#";

pub const ATTRIBUTE_PK: &str = "pk";
pub const ATTRIBUTE_SK: &str = "sk";
pub const ATTRIBUTE_GSI_1_PK: &str = "GSI1PK";
pub const ATTRIBUTE_GSI_1_SK: &str = "GSI1SK";
pub const ATTRIBUTE_REGION: &str = "region";
pub const ATTRIBUTE_CONNECTION_ID: &str = "connectionId";
pub const ATTRIBUTE_STAGE: &str = "stage";
pub const ATTRIBUTE_API_ID: &str = "apiId";
pub const ATTRIBUTE_DOMAIN_NAME: &str = "domainName";

/// Composite key shared by `pk`, `sk` and `GSI1SK`
pub fn composite_key(connection: &Connection) -> String {
    [
        ENTITY_KEY_PREFIX,
        connection.connection_id(),
        connection.api_id(),
        connection.stage(),
    ]
    .join(KEY_SEPARATOR)
}

/// Flat representation of a connection as stored in the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionRecord {
    pub pk: String,
    pub sk: String,
    #[serde(rename = "GSI1PK")]
    pub gsi1_pk: String,
    #[serde(rename = "GSI1SK")]
    pub gsi1_sk: String,
    pub region: String,
    #[serde(rename = "connectionId")]
    pub connection_id: String,
    pub stage: String,
    #[serde(rename = "apiId")]
    pub api_id: String,
    #[serde(rename = "domainName", skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
}

impl ConnectionRecord {
    /// Primary key attributes, used for deletes
    pub fn key(&self) -> Vec<(&'static str, String)> {
        vec![
            (ATTRIBUTE_PK, self.pk.clone()),
            (ATTRIBUTE_SK, self.sk.clone()),
        ]
    }

    /// All attributes of the item, in a fixed order
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = self.key();
        attributes.extend([
            (ATTRIBUTE_GSI_1_PK, self.gsi1_pk.clone()),
            (ATTRIBUTE_GSI_1_SK, self.gsi1_sk.clone()),
            (ATTRIBUTE_REGION, self.region.clone()),
            (ATTRIBUTE_CONNECTION_ID, self.connection_id.clone()),
            (ATTRIBUTE_STAGE, self.stage.clone()),
            (ATTRIBUTE_API_ID, self.api_id.clone()),
        ]);
        if let Some(ref domain_name) = self.domain_name {
            attributes.push((ATTRIBUTE_DOMAIN_NAME, domain_name.clone()));
        }
        attributes
    }
}

impl From<&Connection> for ConnectionRecord {
    fn from(connection: &Connection) -> Self {
        let key = composite_key(connection);
        Self {
            pk: key.clone(),
            sk: key.clone(),
            gsi1_pk: ENTITY_TYPE.to_string(),
            gsi1_sk: key,
            region: connection.region().to_string(),
            connection_id: connection.connection_id().to_string(),
            stage: connection.stage().to_string(),
            api_id: connection.api_id().to_string(),
            domain_name: connection.domain_name().map(str::to_string),
        }
    }
}
