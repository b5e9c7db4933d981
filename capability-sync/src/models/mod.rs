//! Domain models for capability-sync.

#![allow(clippy::should_implement_trait)]

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Entitlements
// ============================================================================

/// Parsed entitlements descriptor: entitlement key to JSON-like value.
///
/// Backed by `serde_json::Map`, so iteration follows key order and results
/// built from it are deterministic.
pub type EntitlementsMap = serde_json::Map<String, Value>;

/// Whether an entitlement value counts as "set".
///
/// `null`, `false`, `0` and `""` are unset. Arrays and objects are set even
/// when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Capability Types
// ============================================================================

/// Remote capability kinds. Wire names are sent to the portal verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapabilityType {
    AccessWifiInformation,
    AppGroups,
    ApplePay,
    AppleIdAuth,
    AssociatedDomains,
    AutofillCredentialProvider,
    ClassKit,
    CoreMediaHlsLowLatency,
    DataProtection,
    DeclaredAgeRange,
    ExtendedVirtualAddressing,
    FamilyControls,
    FileProviderTestingMode,
    FontInstallation,
    GameCenter,
    GroupActivities,
    HealthKit,
    HealthKitRecalibrateEstimates,
    HomeKit,
    HotSpot,
    ICloud,
    InAppPurchase,
    InterAppAudio,
    JournalingSuggestions,
    Maps,
    MatterAllowSetupPayload,
    MediaDeviceDiscovery,
    Multipath,
    NetworkCustomProtocol,
    NetworkExtensions,
    NfcTagReading,
    OnDemandInstallCapable,
    ParentApplicationIdentifiers,
    PersonalVpn,
    PushNotifications,
    PushToTalk,
    SensitiveContentAnalysis,
    ShallowDepthPressure,
    SiriKit,
    SystemExtensionInstall,
    UserManagement,
    UserNotificationsCommunication,
    UserNotificationsTimeSensitive,
    Wallet,
    WeatherKit,
    WirelessAccessoryConfiguration,
}

impl CapabilityType {
    pub const ALL: &'static [CapabilityType] = &[
        Self::AccessWifiInformation,
        Self::AppGroups,
        Self::ApplePay,
        Self::AppleIdAuth,
        Self::AssociatedDomains,
        Self::AutofillCredentialProvider,
        Self::ClassKit,
        Self::CoreMediaHlsLowLatency,
        Self::DataProtection,
        Self::DeclaredAgeRange,
        Self::ExtendedVirtualAddressing,
        Self::FamilyControls,
        Self::FileProviderTestingMode,
        Self::FontInstallation,
        Self::GameCenter,
        Self::GroupActivities,
        Self::HealthKit,
        Self::HealthKitRecalibrateEstimates,
        Self::HomeKit,
        Self::HotSpot,
        Self::ICloud,
        Self::InAppPurchase,
        Self::InterAppAudio,
        Self::JournalingSuggestions,
        Self::Maps,
        Self::MatterAllowSetupPayload,
        Self::MediaDeviceDiscovery,
        Self::Multipath,
        Self::NetworkCustomProtocol,
        Self::NetworkExtensions,
        Self::NfcTagReading,
        Self::OnDemandInstallCapable,
        Self::ParentApplicationIdentifiers,
        Self::PersonalVpn,
        Self::PushNotifications,
        Self::PushToTalk,
        Self::SensitiveContentAnalysis,
        Self::ShallowDepthPressure,
        Self::SiriKit,
        Self::SystemExtensionInstall,
        Self::UserManagement,
        Self::UserNotificationsCommunication,
        Self::UserNotificationsTimeSensitive,
        Self::Wallet,
        Self::WeatherKit,
        Self::WirelessAccessoryConfiguration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessWifiInformation => "ACCESS_WIFI_INFORMATION",
            Self::AppGroups => "APP_GROUPS",
            Self::ApplePay => "APPLE_PAY",
            Self::AppleIdAuth => "APPLE_ID_AUTH",
            Self::AssociatedDomains => "ASSOCIATED_DOMAINS",
            Self::AutofillCredentialProvider => "AUTOFILL_CREDENTIAL_PROVIDER",
            Self::ClassKit => "CLASSKIT",
            Self::CoreMediaHlsLowLatency => "COREMEDIA_HLS_LOW_LATENCY",
            Self::DataProtection => "DATA_PROTECTION",
            Self::DeclaredAgeRange => "DECLARED_AGE_RANGE",
            Self::ExtendedVirtualAddressing => "EXTENDED_VIRTUAL_ADDRESSING",
            Self::FamilyControls => "FAMILY_CONTROLS",
            Self::FileProviderTestingMode => "FILEPROVIDER_TESTINGMODE",
            Self::FontInstallation => "FONT_INSTALLATION",
            Self::GameCenter => "GAME_CENTER",
            Self::GroupActivities => "GROUP_ACTIVITIES",
            Self::HealthKit => "HEALTHKIT",
            Self::HealthKitRecalibrateEstimates => "HEALTHKIT_RECALIBRATE_ESTIMATES",
            Self::HomeKit => "HOMEKIT",
            Self::HotSpot => "HOT_SPOT",
            Self::ICloud => "ICLOUD",
            Self::InAppPurchase => "IN_APP_PURCHASE",
            Self::InterAppAudio => "INTER_APP_AUDIO",
            Self::JournalingSuggestions => "JOURNALING_SUGGESTIONS",
            Self::Maps => "MAPS",
            Self::MatterAllowSetupPayload => "MATTER_ALLOW_SETUP_PAYLOAD",
            Self::MediaDeviceDiscovery => "MEDIA_DEVICE_DISCOVERY",
            Self::Multipath => "MULTIPATH",
            Self::NetworkCustomProtocol => "NETWORK_CUSTOM_PROTOCOL",
            Self::NetworkExtensions => "NETWORK_EXTENSIONS",
            Self::NfcTagReading => "NFC_TAG_READING",
            Self::OnDemandInstallCapable => "ON_DEMAND_INSTALL_CAPABLE",
            Self::ParentApplicationIdentifiers => "PARENT_APPLICATION_IDENTIFIERS",
            Self::PersonalVpn => "PERSONAL_VPN",
            Self::PushNotifications => "PUSH_NOTIFICATIONS",
            Self::PushToTalk => "PUSH_TO_TALK",
            Self::SensitiveContentAnalysis => "SENSITIVE_CONTENT_ANALYSIS",
            Self::ShallowDepthPressure => "SHALLOW_DEPTH_PRESSURE",
            Self::SiriKit => "SIRIKIT",
            Self::SystemExtensionInstall => "SYSTEM_EXTENSION_INSTALL",
            Self::UserManagement => "USER_MANAGEMENT",
            Self::UserNotificationsCommunication => "USERNOTIFICATIONS_COMMUNICATION",
            Self::UserNotificationsTimeSensitive => "USERNOTIFICATIONS_TIMESENSITIVE",
            Self::Wallet => "WALLET",
            Self::WeatherKit => "WEATHERKIT",
            Self::WirelessAccessoryConfiguration => "WIRELESS_ACCESSORY_CONFIGURATION",
        }
    }

    /// Parse a wire name. Unknown names return `None`.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for CapabilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CapabilityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Recover a capability type from a remote capability id.
///
/// Remote ids are `<app identifier resource id>_<CAPABILITY_TYPE>`. The text
/// after the first `_` is tried first; if the resource id itself contains an
/// underscore, the longest known `_<CAPABILITY_TYPE>` suffix is used instead.
/// Returns `None` for capability types this crate does not know.
pub fn parse_capability_type(id: &str) -> Option<CapabilityType> {
    if let Some(parsed) = id
        .split_once('_')
        .and_then(|(_, rest)| CapabilityType::from_str(rest))
    {
        return Some(parsed);
    }

    CapabilityType::ALL
        .iter()
        .copied()
        .filter(|t| {
            id.strip_suffix(t.as_str())
                .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('_'))
        })
        .max_by_key(|t| t.as_str().len())
}

// ============================================================================
// Option Values
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToggleOption {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataProtectionOption {
    CompleteProtection,
    ProtectedUnlessOpen,
    ProtectedUntilFirstUserAuth,
}

impl DataProtectionOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompleteProtection => "COMPLETE_PROTECTION",
            Self::ProtectedUnlessOpen => "PROTECTED_UNLESS_OPEN",
            Self::ProtectedUntilFirstUserAuth => "PROTECTED_UNTIL_FIRST_USER_AUTH",
        }
    }

    /// Map a `com.apple.developer.default-data-protection` value.
    pub fn from_entitlement(value: &str) -> Option<Self> {
        match value {
            "NSFileProtectionComplete" => Some(Self::CompleteProtection),
            "NSFileProtectionCompleteUnlessOpen" => Some(Self::ProtectedUnlessOpen),
            "NSFileProtectionCompleteUntilFirstUserAuthentication" => {
                Some(Self::ProtectedUntilFirstUserAuth)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PushNotificationsOption {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
    #[serde(rename = "PUSH_NOTIFICATION_FEATURE_BROADCAST")]
    Broadcast,
}

impl PushNotificationsOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
            Self::Broadcast => "PUSH_NOTIFICATION_FEATURE_BROADCAST",
        }
    }
}

/// The `option` of an update entry. Serializes to the bare wire constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RemoteOptionValue {
    Toggle(ToggleOption),
    DataProtection(DataProtectionOption),
    PushNotifications(PushNotificationsOption),
}

impl RemoteOptionValue {
    pub const ON: Self = Self::Toggle(ToggleOption::On);
    pub const OFF: Self = Self::Toggle(ToggleOption::Off);

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toggle(ToggleOption::On) => "ON",
            Self::Toggle(ToggleOption::Off) => "OFF",
            Self::DataProtection(option) => option.as_str(),
            Self::PushNotifications(option) => option.as_str(),
        }
    }
}

impl fmt::Display for RemoteOptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Remote Capability Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySettingOption {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySetting {
    pub key: String,
    #[serde(default)]
    pub options: Vec<CapabilitySettingOption>,
}

impl CapabilitySetting {
    /// A setting with a single selected option.
    pub fn single(key: &str, option: &str) -> Self {
        Self {
            key: key.to_string(),
            options: vec![CapabilitySettingOption {
                key: option.to_string(),
                enabled: None,
            }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub settings: Option<Vec<CapabilitySetting>>,
}

/// A capability already registered for the target app identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCapability {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: CapabilityAttributes,
}

impl RemoteCapability {
    /// A boolean-shaped capability with no settings payload.
    pub fn bare(app_id: &str, capability: CapabilityType) -> Self {
        Self {
            id: format!("{}_{}", app_id, capability),
            attributes: CapabilityAttributes::default(),
        }
    }

    /// A capability reporting an explicit `enabled` flag.
    pub fn with_enabled(app_id: &str, capability: CapabilityType, enabled: bool) -> Self {
        let mut cap = Self::bare(app_id, capability);
        cap.attributes.enabled = Some(enabled);
        cap
    }

    /// A capability carrying a settings payload.
    pub fn with_settings(
        app_id: &str,
        capability: CapabilityType,
        enabled: bool,
        settings: Vec<CapabilitySetting>,
    ) -> Self {
        let mut cap = Self::with_enabled(app_id, capability, enabled);
        cap.attributes.settings = Some(settings);
        cap
    }

    /// The explicit `capabilityType` attribute when present, otherwise the
    /// type parsed from `id`.
    pub fn capability_type(&self) -> Option<CapabilityType> {
        match self.attributes.capability_type.as_deref() {
            Some(explicit) => CapabilityType::from_str(explicit),
            None => parse_capability_type(&self.id),
        }
    }

    pub fn is_type(&self, capability: CapabilityType) -> bool {
        self.capability_type() == Some(capability)
    }

    pub fn has_settings(&self) -> bool {
        self.attributes.settings.is_some()
    }

    /// Key of the first option of the first setting, if any.
    pub fn first_setting_option(&self) -> Option<&str> {
        self.attributes
            .settings
            .as_ref()?
            .first()?
            .options
            .first()
            .map(|o| o.key.as_str())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Sync Operation Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    Skip,
    Disable,
    Enable { option: RemoteOptionValue },
}

impl SyncOperation {
    pub fn enable(option: RemoteOptionValue) -> Self {
        Self::Enable { option }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Disable => "disable",
            Self::Enable { .. } => "enable",
        }
    }
}

/// One entry of the batched capability update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestEntry {
    pub capability_type: CapabilityType,
    pub option: RemoteOptionValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<&'static str, Vec<String>>>,
}

impl UpdateRequestEntry {
    pub fn new(capability_type: CapabilityType, option: RemoteOptionValue) -> Self {
        Self {
            capability_type,
            option,
            relationships: None,
        }
    }

    pub fn disable(capability_type: CapabilityType) -> Self {
        Self::new(capability_type, RemoteOptionValue::OFF)
    }

    pub fn with_relationship(
        capability_type: CapabilityType,
        relationship: &'static str,
        ids: Vec<String>,
    ) -> Self {
        Self {
            capability_type,
            option: RemoteOptionValue::ON,
            relationships: Some(BTreeMap::from([(relationship, ids)])),
        }
    }

    pub fn is_disable(&self) -> bool {
        self.option == RemoteOptionValue::OFF
    }
}

/// Caller-supplied flags that influence resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalOptions {
    #[serde(default)]
    pub uses_broadcast_push_notifications: bool,
}

// ============================================================================
// Identifier Models
// ============================================================================

/// Separately managed identifier resources a capability can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentifierKind {
    MerchantId,
    AppGroup,
    CloudContainer,
}

impl IdentifierKind {
    /// Prefix every identifier string of this kind must carry.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::MerchantId => "merchant.",
            Self::AppGroup => "group.",
            Self::CloudContainer => "iCloud.",
        }
    }

    /// Relationship name used in update entries.
    pub fn relationship(&self) -> &'static str {
        match self {
            Self::MerchantId => "merchantIds",
            Self::AppGroup => "appGroups",
            Self::CloudContainer => "cloudContainers",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MerchantId => "Merchant ID",
            Self::AppGroup => "App Group",
            Self::CloudContainer => "iCloud Container",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityIdentifier {
    pub id: String,
    pub identifier: String,
}

/// The application identifier being synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentifierRef {
    /// Remote resource id.
    pub id: String,
    /// Bundle identifier, e.g. `com.example.app`.
    pub identifier: String,
}

// ============================================================================
// Result Models
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySyncResult {
    pub enabled_names: Vec<String>,
    pub disabled_names: Vec<String>,
    pub update_batch: Vec<UpdateRequestEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierSyncResult {
    pub created: Vec<String>,
    pub linked: Vec<String>,
    pub relationship_batch: Vec<UpdateRequestEntry>,
}
