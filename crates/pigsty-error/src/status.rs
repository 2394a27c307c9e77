//! HTTP status codes, the common language errors use to classify themselves.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Standard HTTP status codes. The display form is the reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[repr(u16)]
#[non_exhaustive]
pub enum HttpStatusCode {
    // =========================================================================
    // 1xx informational
    // =========================================================================
    #[strum(serialize = "Continue")]
    Continue = 100,
    #[strum(serialize = "Switching Protocols")]
    SwitchingProtocols = 101,
    #[strum(serialize = "Processing")]
    Processing = 102,
    #[strum(serialize = "Early Hints")]
    EarlyHints = 103,

    // =========================================================================
    // 2xx success
    // =========================================================================
    #[strum(serialize = "OK")]
    Ok = 200,
    #[strum(serialize = "Created")]
    Created = 201,
    #[strum(serialize = "Accepted")]
    Accepted = 202,
    #[strum(serialize = "Non-Authoritative Information")]
    NonAuthoritativeInformation = 203,
    #[strum(serialize = "No Content")]
    NoContent = 204,
    #[strum(serialize = "Reset Content")]
    ResetContent = 205,
    #[strum(serialize = "Partial Content")]
    PartialContent = 206,
    #[strum(serialize = "Multi-Status")]
    MultiStatus = 207,

    // =========================================================================
    // 3xx redirection
    // =========================================================================
    #[strum(serialize = "Multiple Choices")]
    MultipleChoices = 300,
    #[strum(serialize = "Moved Permanently")]
    MovedPermanently = 301,
    #[strum(serialize = "Found")]
    Found = 302,
    #[strum(serialize = "See Other")]
    SeeOther = 303,
    #[strum(serialize = "Not Modified")]
    NotModified = 304,
    #[strum(serialize = "Temporary Redirect")]
    TemporaryRedirect = 307,
    #[strum(serialize = "Permanent Redirect")]
    PermanentRedirect = 308,

    // =========================================================================
    // 4xx client errors
    // =========================================================================
    #[strum(serialize = "Bad Request")]
    BadRequest = 400,
    #[strum(serialize = "Unauthorized")]
    Unauthorized = 401,
    #[strum(serialize = "Payment Required")]
    PaymentRequired = 402,
    #[strum(serialize = "Forbidden")]
    Forbidden = 403,
    #[strum(serialize = "Not Found")]
    NotFound = 404,
    #[strum(serialize = "Method Not Allowed")]
    MethodNotAllowed = 405,
    #[strum(serialize = "Not Acceptable")]
    NotAcceptable = 406,
    #[strum(serialize = "Proxy Authentication Required")]
    ProxyAuthenticationRequired = 407,
    #[strum(serialize = "Request Timeout")]
    RequestTimeout = 408,
    #[strum(serialize = "Conflict")]
    Conflict = 409,
    #[strum(serialize = "Gone")]
    Gone = 410,
    #[strum(serialize = "Length Required")]
    LengthRequired = 411,
    #[strum(serialize = "Precondition Failed")]
    PreconditionFailed = 412,
    #[strum(serialize = "Payload Too Large")]
    PayloadTooLarge = 413,
    #[strum(serialize = "URI Too Long")]
    UriTooLong = 414,
    #[strum(serialize = "Unsupported Media Type")]
    UnsupportedMediaType = 415,
    #[strum(serialize = "Range Not Satisfiable")]
    RangeNotSatisfiable = 416,
    #[strum(serialize = "Expectation Failed")]
    ExpectationFailed = 417,
    #[strum(serialize = "I'm a teapot")]
    ImATeapot = 418,
    #[strum(serialize = "Unprocessable Entity")]
    UnprocessableEntity = 422,
    #[strum(serialize = "Locked")]
    Locked = 423,
    #[strum(serialize = "Failed Dependency")]
    FailedDependency = 424,
    #[strum(serialize = "Upgrade Required")]
    UpgradeRequired = 426,
    #[strum(serialize = "Precondition Required")]
    PreconditionRequired = 428,
    #[strum(serialize = "Too Many Requests")]
    TooManyRequests = 429,
    #[strum(serialize = "Request Header Fields Too Large")]
    RequestHeaderFieldsTooLarge = 431,
    #[strum(serialize = "Unavailable For Legal Reasons")]
    UnavailableForLegalReasons = 451,

    // =========================================================================
    // 5xx server errors
    // =========================================================================
    #[strum(serialize = "Internal Server Error")]
    InternalServerError = 500,
    #[strum(serialize = "Not Implemented")]
    NotImplemented = 501,
    #[strum(serialize = "Bad Gateway")]
    BadGateway = 502,
    #[strum(serialize = "Service Unavailable")]
    ServiceUnavailable = 503,
    #[strum(serialize = "Gateway Timeout")]
    GatewayTimeout = 504,
    #[strum(serialize = "HTTP Version Not Supported")]
    HttpVersionNotSupported = 505,
    #[strum(serialize = "Insufficient Storage")]
    InsufficientStorage = 507,
    #[strum(serialize = "Network Authentication Required")]
    NetworkAuthenticationRequired = 511,
}

impl HttpStatusCode {
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Reason phrase, e.g. `Not Found`
    pub fn text(self) -> &'static str {
        self.into()
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::iter().find(|status| status.code() == code)
    }

    pub fn is_client_error(self) -> bool {
        (400..500).contains(&self.code())
    }

    pub fn is_server_error(self) -> bool {
        self.code() >= 500
    }
}

impl From<HttpStatusCode> for u16 {
    fn from(status: HttpStatusCode) -> Self {
        status.code()
    }
}

/// Reason phrase for a numeric code, if it is a standard one.
pub fn http_status_text(code: u16) -> Option<&'static str> {
    HttpStatusCode::from_code(code).map(HttpStatusCode::text)
}

/// The message an error falls back to when all it has is a status: `Not Found (404)`.
pub fn status_message(code: u16) -> String {
    format!(
        "{} ({})",
        http_status_text(code).unwrap_or("Unknown Status"),
        code
    )
}
