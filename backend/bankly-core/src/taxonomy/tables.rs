//! Upstream code → catalog lookup tables, one per error family.
//!
//! Tables are built once on first use and never mutated afterwards.
//! Upstream systems reuse a few codes with family-specific meaning
//! (`INVALID_PASSWORD` is a card password on card endpoints), so lookups go
//! through a family first and fall back to the generic table.

use super::catalog::ErrorKind;

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Group of endpoints sharing one upstream error vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorFamily {
    Generic,
    Card,
    Pix,
    IncomeReport,
    Transfer,
}

impl ErrorFamily {
    /// Order used when the family is not known.
    pub const SEARCH_ORDER: [ErrorFamily; 5] = [
        ErrorFamily::Generic,
        ErrorFamily::Transfer,
        ErrorFamily::Card,
        ErrorFamily::Pix,
        ErrorFamily::IncomeReport,
    ];

    /// Look `code` up in this family's table only.
    pub fn lookup(&self, code: &str) -> Option<ErrorKind> {
        self.table().get(code).copied()
    }

    /// Family table, then the generic table, then the catalog keys themselves.
    pub fn resolve(&self, code: &str) -> Option<ErrorKind> {
        self.lookup(code)
            .or_else(|| match self {
                ErrorFamily::Generic => None,
                _ => ErrorFamily::Generic.lookup(code),
            })
            .or_else(|| ErrorKind::from_key(code))
    }

    /// Search every table in [`SEARCH_ORDER`](Self::SEARCH_ORDER), then the
    /// catalog keys.
    pub fn resolve_any(code: &str) -> Option<ErrorKind> {
        Self::SEARCH_ORDER
            .iter()
            .find_map(|family| family.lookup(code))
            .or_else(|| ErrorKind::from_key(code))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorFamily::Generic => "generic",
            ErrorFamily::Card => "card",
            ErrorFamily::Pix => "pix",
            ErrorFamily::IncomeReport => "income_report",
            ErrorFamily::Transfer => "transfer",
        }
    }

    fn table(&self) -> &'static HashMap<&'static str, ErrorKind> {
        match self {
            ErrorFamily::Generic => &*GENERIC,
            ErrorFamily::Card => &*CARD,
            ErrorFamily::Pix => &*PIX,
            ErrorFamily::IncomeReport => &*INCOME_REPORT,
            ErrorFamily::Transfer => &*TRANSFER,
        }
    }
}

const GENERIC_CODES: &[(&str, ErrorKind)] = &[
    ("ENTRY_NOT_FOUND", ErrorKind::EntryNotFound),
    ("NOT_FOUND", ErrorKind::EntryNotFound),
    ("FORBIDDEN", ErrorKind::ServiceForbidden),
    ("GATEWAY_TIMEOUT", ErrorKind::GatewayTimeout),
    ("INVALID_PARAMETER", ErrorKind::InvalidParameter),
    ("INVALID_PARAMETER_LENGTH", ErrorKind::InvalidParameterLength),
    ("INVALID_REGISTER_NAME_LENGTH", ErrorKind::InvalidRegisterNameLength),
    ("INVALID_SOCIAL_NAME_LENGTH", ErrorKind::InvalidSocialNameLength),
    ("INVALID_TRADE_NAME_LENGTH", ErrorKind::InvalidTradeNameLength),
    ("INVALID_BUSINESS_NAME_LENGTH", ErrorKind::InvalidBusinessNameLength),
    ("INVALID_MOTHER_NAME_LENGTH", ErrorKind::InvalidMotherNameLength),
    ("INVALID_NAME_LENGTH", ErrorKind::InvalidNameLength),
    ("INVALID_EMAIL_LENGTH", ErrorKind::InvalidEmailLength),
    ("INVALID_ADDRESS_LENGTH", ErrorKind::InvalidAddressLength),
    ("INVALID_COMPLEMENT_LENGTH", ErrorKind::InvalidComplementLength),
    ("INVALID_NEIGHBORHOOD_LENGTH", ErrorKind::InvalidNeighborhoodLength),
    ("INVALID_CITY_LENGTH", ErrorKind::InvalidCityLength),
    ("INVALID_ZIP_CODE", ErrorKind::InvalidZipCode),
    ("INVALID_ZIPCODE", ErrorKind::InvalidZipCode),
    ("INVALID_PHONE_NUMBER", ErrorKind::InvalidPhoneNumber),
    ("INVALID_BIRTH_DATE", ErrorKind::InvalidBirthDate),
    ("INVALID_DOCUMENT", ErrorKind::InvalidDocument),
    ("INVALID_DOCUMENT_NUMBER", ErrorKind::InvalidDocument),
    ("INVALID_AMOUNT", ErrorKind::InvalidAmount),
    ("INVALID_CORRELATION_ID", ErrorKind::InvalidCorrelationId),
    ("INVALID_ACCOUNT_NUMBER", ErrorKind::InvalidAccountNumber),
    ("INVALID_BRANCH", ErrorKind::InvalidBranch),
    ("INVALID_API_VERSION", ErrorKind::InvalidApiVersion),
    ("TOO_MANY_REQUESTS", ErrorKind::TooManyRequests),
    ("INTERNAL_SERVER_ERROR", ErrorKind::InternalServerError),
    ("INVALID_BUSINESS_SIZE", ErrorKind::InvalidBusinessSize),
    ("INVALID_BUSINESS_TYPE", ErrorKind::InvalidBusinessType),
    ("INVALID_LEGAL_NATURE", ErrorKind::InvalidLegalNature),
    ("HOLDER_ALREADY_HAVE_A_ACCOUNT", ErrorKind::HolderAlreadyHasAccount),
    ("HOLDER_ALREADY_HAS_ACCOUNT", ErrorKind::HolderAlreadyHasAccount),
    ("ACCOUNT_HOLDER_NOT_EXISTS", ErrorKind::AccountHolderNotExists),
    ("DOCUMENT_ALREADY_USED", ErrorKind::DocumentAlreadyUsed),
    ("CUSTOMER_REGISTRATION_PENDING", ErrorKind::CustomerRegistrationPending),
    ("ACCOUNT_BLOCKED", ErrorKind::AccountBlocked),
    ("INSUFFICIENT_BALANCE", ErrorKind::InsufficientBalance),
    ("INVALID_BARCODE", ErrorKind::InvalidBarcode),
    ("INVALID_DIGITABLE_LINE", ErrorKind::InvalidBarcode),
    ("BOLETO_ALREADY_PAID", ErrorKind::BoletoAlreadyPaid),
    ("ALREADY_PAID", ErrorKind::BoletoAlreadyPaid),
    ("BOLETO_EXPIRED", ErrorKind::BoletoExpired),
    ("INVALID_DUE_DATE", ErrorKind::InvalidDueDate),
    ("PAYMENT_NOT_ALLOWED", ErrorKind::PaymentNotAllowed),
];

const CARD_CODES: &[(&str, ErrorKind)] = &[
    ("CARD_ALREADY_ACTIVE", ErrorKind::CardAlreadyActivated),
    ("CARD_ALREADY_ACTIVATED", ErrorKind::CardAlreadyActivated),
    ("CARD_ACTIVATION_FAILED", ErrorKind::CardActivationFailed),
    ("INVALID_ACTIVATE_CODE", ErrorKind::InvalidActivateCode),
    ("INVALID_ACTIVATION_CODE", ErrorKind::InvalidActivateCode),
    ("INVALID_PASSWORD", ErrorKind::InvalidCardPassword),
    ("INVALID_CARD_PASSWORD", ErrorKind::InvalidCardPassword),
    ("CARD_STATUS_UPDATE_FAILED", ErrorKind::CardStatusUpdateFailed),
    ("INVALID_STATUS_TRANSITION", ErrorKind::CardStatusUpdateFailed),
    ("CARD_ALREADY_BLOCKED", ErrorKind::CardAlreadyBlocked),
    ("INVALID_CARD_NAME", ErrorKind::InvalidCardName),
    ("INVALID_NAME", ErrorKind::InvalidCardName),
    ("INVALID_CARD_TYPE", ErrorKind::InvalidCardType),
];

const PIX_CODES: &[(&str, ErrorKind)] = &[
    ("ENTRY_ALREADY_EXISTS", ErrorKind::PixKeyAlreadyExists),
    ("ENTRY_KEY_ALREADY_EXISTS", ErrorKind::PixKeyAlreadyExists),
    ("PIX_KEY_ALREADY_EXISTS", ErrorKind::PixKeyAlreadyExists),
    ("ENTRY_KEY_NOT_FOUND", ErrorKind::PixKeyNotFound),
    ("PIX_KEY_NOT_FOUND", ErrorKind::PixKeyNotFound),
    ("INVALID_KEY_TYPE", ErrorKind::InvalidPixKeyType),
    ("INVALID_KEY_VALUE", ErrorKind::InvalidPixKeyValue),
    ("ENTRY_LIMIT_EXCEEDED", ErrorKind::PixKeyLimitReached),
    ("ENTRY_LOCKED_BY_CLAIM", ErrorKind::PixKeyClaimInProgress),
    ("CLAIM_IN_PROGRESS", ErrorKind::PixKeyClaimInProgress),
    ("INVALID_QR_CODE", ErrorKind::InvalidQrCode),
    ("INVALID_QRCODE_PAYLOAD", ErrorKind::InvalidQrCode),
];

const INCOME_REPORT_CODES: &[(&str, ErrorKind)] = &[
    ("INCOME_REPORT_NOT_FOUND", ErrorKind::IncomeReportNotFound),
    ("INVALID_CALENDAR", ErrorKind::InvalidIncomeReportCalendar),
    ("INVALID_YEAR", ErrorKind::InvalidIncomeReportCalendar),
    ("INVALID_INCOME_REPORT_PARAMETER", ErrorKind::InvalidIncomeReportParameter),
];

const TRANSFER_CODES: &[(&str, ErrorKind)] = &[
    ("CASHOUT_LIMIT_NOT_ENOUGH", ErrorKind::CashoutLimitNotEnough),
    ("INSUFFICIENT_BALANCE", ErrorKind::InsufficientBalance),
    ("BALANCE_NOT_ENOUGH", ErrorKind::InsufficientBalance),
    ("OUT_OF_SERVICE_PERIOD", ErrorKind::OutOfServicePeriod),
    ("SCHEDULING_DUPLICATED", ErrorKind::DuplicateTransfer),
    ("DUPLICATE_TRANSFER", ErrorKind::DuplicateTransfer),
    ("INVALID_AMOUNT", ErrorKind::InvalidAmount),
    ("INVALID_CORRELATION_ID", ErrorKind::InvalidCorrelationId),
    ("INVALID_ACCOUNT_NUMBER", ErrorKind::InvalidAccountNumber),
    ("RECIPIENT_ACCOUNT_INVALID", ErrorKind::InvalidTransferAccount),
    ("ACCOUNT_NOT_ALLOWED", ErrorKind::TransferNotAllowed),
];

fn build(codes: &'static [(&'static str, ErrorKind)]) -> HashMap<&'static str, ErrorKind> {
    codes.iter().copied().collect()
}

static GENERIC: Lazy<HashMap<&'static str, ErrorKind>> = Lazy::new(|| build(GENERIC_CODES));
static CARD: Lazy<HashMap<&'static str, ErrorKind>> = Lazy::new(|| build(CARD_CODES));
static PIX: Lazy<HashMap<&'static str, ErrorKind>> = Lazy::new(|| build(PIX_CODES));
static INCOME_REPORT: Lazy<HashMap<&'static str, ErrorKind>> =
    Lazy::new(|| build(INCOME_REPORT_CODES));
static TRANSFER: Lazy<HashMap<&'static str, ErrorKind>> = Lazy::new(|| build(TRANSFER_CODES));

#[cfg(test)]
pub(crate) fn raw_tables() -> [(ErrorFamily, &'static [(&'static str, ErrorKind)]); 5] {
    [
        (ErrorFamily::Generic, GENERIC_CODES),
        (ErrorFamily::Card, CARD_CODES),
        (ErrorFamily::Pix, PIX_CODES),
        (ErrorFamily::IncomeReport, INCOME_REPORT_CODES),
        (ErrorFamily::Transfer, TRANSFER_CODES),
    ]
}
