//! Static classifier rows.

use super::validate::OptionsValidator::{
    AnyStringArray, Boolean, PrefixedStringArray, StringArray, StringEnum,
};
use super::{
    CapabilityClassifier, SyncStrategy, APPLE_ID_AUTH_APP_CONSENT,
    APPLE_ID_AUTH_PRIMARY_APP_CONSENT, ICLOUD_VERSION, ICLOUD_XCODE_6,
};
use crate::models::{CapabilityType, IdentifierKind};

const ENVIRONMENTS: &[&str] = &["development", "production"];

const DATA_PROTECTION_LEVELS: &[&str] = &[
    "NSFileProtectionComplete",
    "NSFileProtectionCompleteUnlessOpen",
    "NSFileProtectionCompleteUntilFirstUserAuthentication",
];

const ASSOCIATED_DOMAIN_SERVICES: &[&str] = &[
    "applinks:",
    "webcredentials:",
    "activitycontinuation:",
    "appclips:",
];

const NETWORK_EXTENSION_TYPES: &[&str] = &[
    "dns-proxy",
    "app-proxy-provider",
    "content-filter-provider",
    "packet-tunnel-provider",
    "dns-proxy-systemextension",
    "app-proxy-provider-systemextension",
    "content-filter-provider-systemextension",
    "packet-tunnel-provider-systemextension",
    "dns-settings",
    "app-push-provider",
];

pub(super) static CLASSIFIERS: &[CapabilityClassifier] = &[
    CapabilityClassifier {
        name: "HomeKit",
        entitlement: "com.apple.developer.homekit",
        capability: CapabilityType::HomeKit,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Hotspot",
        entitlement: "com.apple.developer.networking.HotspotConfiguration",
        capability: CapabilityType::HotSpot,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Multipath",
        entitlement: "com.apple.developer.networking.multipath",
        capability: CapabilityType::Multipath,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "SiriKit",
        entitlement: "com.apple.developer.siri",
        capability: CapabilityType::SiriKit,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Wireless Accessory Configuration",
        entitlement: "com.apple.external-accessory.wireless-configuration",
        capability: CapabilityType::WirelessAccessoryConfiguration,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Extended Virtual Address Space",
        entitlement: "com.apple.developer.kernel.extended-virtual-addressing",
        capability: CapabilityType::ExtendedVirtualAddressing,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Access WiFi Information",
        entitlement: "com.apple.developer.networking.wifi-info",
        capability: CapabilityType::AccessWifiInformation,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Associated Domains",
        entitlement: "com.apple.developer.associated-domains",
        capability: CapabilityType::AssociatedDomains,
        validator: PrefixedStringArray(ASSOCIATED_DOMAIN_SERVICES),
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "AutoFill Credential Provider",
        entitlement: "com.apple.developer.authentication-services.autofill-credential-provider",
        capability: CapabilityType::AutofillCredentialProvider,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "HealthKit",
        entitlement: "com.apple.developer.healthkit",
        capability: CapabilityType::HealthKit,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "HealthKit Estimate Recalibration",
        entitlement: "com.apple.developer.healthkit.recalibrate-estimates",
        capability: CapabilityType::HealthKitRecalibrateEstimates,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Time Sensitive Notifications",
        entitlement: "com.apple.developer.usernotifications.time-sensitive",
        capability: CapabilityType::UserNotificationsTimeSensitive,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Communication Notifications",
        entitlement: "com.apple.developer.usernotifications.communication",
        capability: CapabilityType::UserNotificationsCommunication,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Group Activities",
        entitlement: "com.apple.developer.group-session",
        capability: CapabilityType::GroupActivities,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Family Controls",
        entitlement: "com.apple.developer.family-controls",
        capability: CapabilityType::FamilyControls,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Data Protection",
        entitlement: "com.apple.developer.default-data-protection",
        capability: CapabilityType::DataProtection,
        validator: StringEnum(DATA_PROTECTION_LEVELS),
        strategy: SyncStrategy::DataProtection,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Inter-App Audio",
        entitlement: "inter-app-audio",
        capability: CapabilityType::InterAppAudio,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Network Extensions",
        entitlement: "com.apple.developer.networking.networkextension",
        capability: CapabilityType::NetworkExtensions,
        validator: StringArray(NETWORK_EXTENSION_TYPES),
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "NFC Tag Reading",
        entitlement: "com.apple.developer.nfc.readersession.formats",
        capability: CapabilityType::NfcTagReading,
        validator: StringArray(&["NDEF", "TAG"]),
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Personal VPN",
        entitlement: "com.apple.developer.networking.vpn.api",
        capability: CapabilityType::PersonalVpn,
        validator: StringArray(&["allow-vpn"]),
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Push Notifications",
        entitlement: "aps-environment",
        capability: CapabilityType::PushNotifications,
        validator: StringEnum(ENVIRONMENTS),
        strategy: SyncStrategy::PushNotifications,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Wallet",
        entitlement: "com.apple.developer.pass-type-identifiers",
        capability: CapabilityType::Wallet,
        validator: AnyStringArray,
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Sign In with Apple",
        entitlement: "com.apple.developer.applesignin",
        capability: CapabilityType::AppleIdAuth,
        validator: StringArray(&["Default"]),
        strategy: SyncStrategy::Settings {
            key: APPLE_ID_AUTH_APP_CONSENT,
            value: APPLE_ID_AUTH_PRIMARY_APP_CONSENT,
        },
        identifier: None,
    },
    CapabilityClassifier {
        name: "Fonts",
        entitlement: "com.apple.developer.user-fonts",
        capability: CapabilityType::FontInstallation,
        validator: StringArray(&["app-usage", "system-installation"]),
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Apple Pay Payment Processing",
        entitlement: "com.apple.developer.in-app-payments",
        capability: CapabilityType::ApplePay,
        validator: PrefixedStringArray(&["merchant."]),
        strategy: SyncStrategy::Defined,
        identifier: Some(IdentifierKind::MerchantId),
    },
    CapabilityClassifier {
        name: "App Groups",
        entitlement: "com.apple.security.application-groups",
        capability: CapabilityType::AppGroups,
        validator: PrefixedStringArray(&["group."]),
        strategy: SyncStrategy::Defined,
        identifier: Some(IdentifierKind::AppGroup),
    },
    CapabilityClassifier {
        name: "iCloud",
        entitlement: "com.apple.developer.icloud-container-identifiers",
        capability: CapabilityType::ICloud,
        validator: PrefixedStringArray(&["iCloud."]),
        strategy: SyncStrategy::Settings {
            key: ICLOUD_VERSION,
            value: ICLOUD_XCODE_6,
        },
        identifier: Some(IdentifierKind::CloudContainer),
    },
    CapabilityClassifier {
        name: "ClassKit",
        entitlement: "com.apple.developer.ClassKit-environment",
        capability: CapabilityType::ClassKit,
        validator: StringEnum(ENVIRONMENTS),
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "On Demand Install Capable (App Clip Extensions)",
        entitlement: "com.apple.developer.on-demand-install-capable",
        capability: CapabilityType::OnDemandInstallCapable,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Parent Application Identifiers (App Clips)",
        entitlement: "com.apple.developer.parent-application-identifiers",
        capability: CapabilityType::ParentApplicationIdentifiers,
        validator: PrefixedStringArray(&["$(AppIdentifierPrefix)"]),
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Game Center",
        entitlement: "com.apple.developer.game-center",
        capability: CapabilityType::GameCenter,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Custom Network Protocol",
        entitlement: "com.apple.developer.networking.custom-protocol",
        capability: CapabilityType::NetworkCustomProtocol,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "System Extension",
        entitlement: "com.apple.developer.system-extension.install",
        capability: CapabilityType::SystemExtensionInstall,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Low Latency HLS",
        entitlement: "com.apple.developer.coremedia.hls.low-latency",
        capability: CapabilityType::CoreMediaHlsLowLatency,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "User Management",
        entitlement: "com.apple.developer.user-management",
        capability: CapabilityType::UserManagement,
        validator: StringArray(&["runs-as-current-user", "get-current-user"]),
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Push to Talk",
        entitlement: "com.apple.developer.push-to-talk",
        capability: CapabilityType::PushToTalk,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "WeatherKit",
        entitlement: "com.apple.developer.weatherkit",
        capability: CapabilityType::WeatherKit,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Journaling Suggestions",
        entitlement: "com.apple.developer.journal.allow",
        capability: CapabilityType::JournalingSuggestions,
        validator: StringArray(&["suggestions"]),
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Sensitive Content Analysis",
        entitlement: "com.apple.developer.sensitivecontentanalysis.client",
        capability: CapabilityType::SensitiveContentAnalysis,
        validator: StringArray(&["analysis"]),
        strategy: SyncStrategy::Defined,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Matter Allow Setup Payload",
        entitlement: "com.apple.developer.matter.allow-setup-payload",
        capability: CapabilityType::MatterAllowSetupPayload,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Media Device Discovery",
        entitlement: "com.apple.developer.media-device-discovery-extension",
        capability: CapabilityType::MediaDeviceDiscovery,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "FileProvider Testing Mode",
        entitlement: "com.apple.developer.fileprovider.testing-mode",
        capability: CapabilityType::FileProviderTestingMode,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Shallow Depth and Pressure",
        entitlement: "com.apple.developer.submerged-shallow-depth-and-pressure",
        capability: CapabilityType::ShallowDepthPressure,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
    CapabilityClassifier {
        name: "Declared Age Range",
        entitlement: "com.apple.developer.declared-age-range",
        capability: CapabilityType::DeclaredAgeRange,
        validator: Boolean,
        strategy: SyncStrategy::Boolean,
        identifier: None,
    },
];
