//! The fixed catalog of domain errors.
//!
//! Each [`ErrorKind`] is a constant triple of taxonomy key, HTTP status and
//! default message. The catalog only grows: existing keys and statuses never
//! change, so callers can persist or compare them.

use common::HttpStatusCode;

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

macro_rules! error_catalog {
    ($( $(#[$meta:meta])* $variant:ident => ($key:literal, $status:literal, $message:literal), )+) => {
        /// Catalogued domain error.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum ErrorKind {
            $( $(#[$meta])* $variant, )+
        }

        impl ErrorKind {
            /// Every catalog entry, in declaration order.
            pub const ALL: &'static [ErrorKind] = &[ $( ErrorKind::$variant, )+ ];

            /// Stable taxonomy key, e.g. `"CARD_ALREADY_ACTIVATED"`.
            pub const fn key(&self) -> &'static str {
                match self {
                    $( ErrorKind::$variant => $key, )+
                }
            }

            pub const fn http_status(&self) -> HttpStatusCode {
                match self {
                    $( ErrorKind::$variant => HttpStatusCode($status), )+
                }
            }

            pub const fn default_message(&self) -> &'static str {
                match self {
                    $( ErrorKind::$variant => $message, )+
                }
            }
        }
    };
}

error_catalog! {
    // Uniform transport-level outcomes, recognised before any body parsing.
    EntryNotFound => ("ENTRY_NOT_FOUND", 404, "entry not found"),
    ServiceForbidden => ("SERVICE_FORBIDDEN", 403, "access to this service is forbidden"),
    GatewayTimeout => ("GATEWAY_TIMEOUT", 504, "upstream gateway timed out"),

    // Generic request validation.
    InvalidParameter => ("INVALID_PARAMETER", 400, "invalid parameter"),
    InvalidParameterLength => ("INVALID_PARAMETER_LENGTH", 400, "invalid parameter length"),
    InvalidRegisterNameLength => ("INVALID_REGISTER_NAME_LENGTH", 400, "invalid register name length"),
    InvalidSocialNameLength => ("INVALID_SOCIAL_NAME_LENGTH", 400, "invalid social name length"),
    InvalidTradeNameLength => ("INVALID_TRADE_NAME_LENGTH", 400, "invalid trade name length"),
    InvalidBusinessNameLength => ("INVALID_BUSINESS_NAME_LENGTH", 400, "invalid business name length"),
    InvalidMotherNameLength => ("INVALID_MOTHER_NAME_LENGTH", 400, "invalid mother name length"),
    InvalidNameLength => ("INVALID_NAME_LENGTH", 400, "invalid name length"),
    InvalidEmailLength => ("INVALID_EMAIL_LENGTH", 400, "invalid email length"),
    InvalidAddressLength => ("INVALID_ADDRESS_LENGTH", 400, "invalid address length"),
    InvalidComplementLength => ("INVALID_COMPLEMENT_LENGTH", 400, "invalid address complement length"),
    InvalidNeighborhoodLength => ("INVALID_NEIGHBORHOOD_LENGTH", 400, "invalid neighborhood length"),
    InvalidCityLength => ("INVALID_CITY_LENGTH", 400, "invalid city length"),
    InvalidZipCode => ("INVALID_ZIP_CODE", 400, "invalid zip code"),
    InvalidPhoneNumber => ("INVALID_PHONE_NUMBER", 400, "invalid phone number"),
    InvalidBirthDate => ("INVALID_BIRTH_DATE", 400, "invalid birth date"),
    InvalidDocument => ("INVALID_DOCUMENT", 400, "invalid document number"),
    InvalidAmount => ("INVALID_AMOUNT", 400, "invalid amount"),
    InvalidCorrelationId => ("INVALID_CORRELATION_ID", 400, "invalid correlation id"),
    InvalidAccountNumber => ("INVALID_ACCOUNT_NUMBER", 400, "invalid account number"),
    InvalidBranch => ("INVALID_BRANCH", 400, "invalid branch"),
    InvalidApiVersion => ("INVALID_API_VERSION", 400, "invalid api version"),
    TooManyRequests => ("TOO_MANY_REQUESTS", 429, "too many requests"),
    InternalServerError => ("INTERNAL_SERVER_ERROR", 500, "upstream internal server error"),

    // Business / customer onboarding.
    InvalidBusinessSize => ("INVALID_BUSINESS_SIZE", 400, "invalid business size"),
    InvalidBusinessType => ("INVALID_BUSINESS_TYPE", 400, "invalid business type"),
    InvalidLegalNature => ("INVALID_LEGAL_NATURE", 400, "invalid legal nature"),
    HolderAlreadyHasAccount => ("HOLDER_ALREADY_HAS_ACCOUNT", 409, "holder already has an account"),
    AccountHolderNotExists => ("ACCOUNT_HOLDER_NOT_EXISTS", 404, "account holder does not exist"),
    DocumentAlreadyUsed => ("DOCUMENT_ALREADY_USED", 409, "document already in use"),
    CustomerRegistrationPending => ("CUSTOMER_REGISTRATION_PENDING", 409, "customer registration is still being analysed"),
    AccountBlocked => ("ACCOUNT_BLOCKED", 409, "account is blocked"),

    // Balance and transfers.
    InsufficientBalance => ("INSUFFICIENT_BALANCE", 400, "insufficient balance"),
    CashoutLimitNotEnough => ("CASHOUT_LIMIT_NOT_ENOUGH", 400, "cash-out limit not enough"),
    OutOfServicePeriod => ("OUT_OF_SERVICE_PERIOD", 400, "transfer requested outside the service period"),
    DuplicateTransfer => ("DUPLICATE_TRANSFER", 409, "transfer already requested"),
    InvalidTransferAccount => ("INVALID_TRANSFER_ACCOUNT", 400, "invalid recipient account"),
    TransferNotAllowed => ("TRANSFER_NOT_ALLOWED", 409, "transfer not allowed for this account"),

    // Boletos and payments.
    InvalidBarcode => ("INVALID_BARCODE", 400, "invalid barcode"),
    BoletoAlreadyPaid => ("BOLETO_ALREADY_PAID", 409, "boleto already paid"),
    BoletoExpired => ("BOLETO_EXPIRED", 400, "boleto expired"),
    InvalidDueDate => ("INVALID_DUE_DATE", 400, "invalid due date"),
    PaymentNotAllowed => ("PAYMENT_NOT_ALLOWED", 409, "payment not allowed"),

    // Cards.
    CardAlreadyActivated => ("CARD_ALREADY_ACTIVATED", 409, "card already activated"),
    CardActivationFailed => ("CARD_ACTIVATION_FAILED", 409, "card could not be activated"),
    InvalidActivateCode => ("INVALID_ACTIVATE_CODE", 400, "invalid activation code"),
    InvalidCardPassword => ("INVALID_CARD_PASSWORD", 400, "invalid card password"),
    CardStatusUpdateFailed => ("CARD_STATUS_UPDATE_FAILED", 409, "card status could not be updated"),
    CardAlreadyBlocked => ("CARD_ALREADY_BLOCKED", 409, "card already blocked"),
    InvalidCardName => ("INVALID_CARD_NAME", 400, "invalid card name"),
    InvalidCardType => ("INVALID_CARD_TYPE", 400, "invalid card type"),

    // PIX.
    PixKeyAlreadyExists => ("PIX_KEY_ALREADY_EXISTS", 409, "pix key already registered"),
    PixKeyNotFound => ("PIX_KEY_NOT_FOUND", 404, "pix key not found"),
    InvalidPixKeyType => ("INVALID_PIX_KEY_TYPE", 400, "invalid pix key type"),
    InvalidPixKeyValue => ("INVALID_PIX_KEY_VALUE", 400, "invalid pix key value"),
    PixKeyLimitReached => ("PIX_KEY_LIMIT_REACHED", 409, "pix key limit reached for this account"),
    PixKeyClaimInProgress => ("PIX_KEY_CLAIM_IN_PROGRESS", 409, "a claim for this pix key is in progress"),
    InvalidQrCode => ("INVALID_QR_CODE", 400, "invalid qr code"),

    // Income reports.
    IncomeReportNotFound => ("INCOME_REPORT_NOT_FOUND", 404, "income report not found"),
    InvalidIncomeReportCalendar => ("INVALID_INCOME_REPORT_CALENDAR", 400, "income report not available for this calendar year"),
    InvalidIncomeReportParameter => ("INVALID_INCOME_REPORT_PARAMETER", 400, "invalid income report parameter"),
}

static BY_KEY: Lazy<HashMap<&'static str, ErrorKind>> = Lazy::new(|| {
    ErrorKind::ALL
        .iter()
        .map(|kind| (kind.key(), *kind))
        .collect()
});

impl ErrorKind {
    /// Catalog entry for a taxonomy key.
    pub fn from_key(key: &str) -> Option<ErrorKind> {
        BY_KEY.get(key).copied()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
