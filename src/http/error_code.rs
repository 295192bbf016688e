//! Numeric transport error codes, numbered the way curl numbers them

pub const OK: u32 = 0;
pub const UNSUPPORTED_PROTOCOL: u32 = 1;
pub const FAILED_INIT: u32 = 2;
pub const URL_MALFORMAT: u32 = 3;
pub const COULDNT_CONNECT: u32 = 7;
pub const WRITE_ERROR: u32 = 23;
pub const OPERATION_TIMEDOUT: u32 = 28;
pub const BAD_FUNCTION_ARGUMENT: u32 = 43;
pub const TOO_MANY_REDIRECTS: u32 = 47;
pub const SEND_ERROR: u32 = 55;
pub const RECV_ERROR: u32 = 56;
pub const BAD_CONTENT_ENCODING: u32 = 61;

pub fn code_for_reqwest_error(err: &reqwest::Error) -> u32 {
    if err.is_timeout() {
        return OPERATION_TIMEDOUT;
    }
    if err.is_connect() {
        return COULDNT_CONNECT;
    }
    if err.is_redirect() {
        return TOO_MANY_REDIRECTS;
    }
    if err.is_builder() {
        return URL_MALFORMAT;
    }
    if err.is_decode() {
        return BAD_CONTENT_ENCODING;
    }
    if err.is_request() {
        return SEND_ERROR;
    }
    RECV_ERROR
}

/// Short description of a code
pub fn describe(code: u32) -> &'static str {
    match code {
        OK => "No error",
        UNSUPPORTED_PROTOCOL => "Unsupported protocol",
        FAILED_INIT => "Failed initialization",
        URL_MALFORMAT => "URL using bad/illegal format or missing URL",
        COULDNT_CONNECT => "Couldn't connect to server",
        WRITE_ERROR => "Failed writing received data to disk/application",
        OPERATION_TIMEDOUT => "Timeout was reached",
        BAD_FUNCTION_ARGUMENT => "A function was given a bad argument",
        TOO_MANY_REDIRECTS => "Number of redirects hit maximum amount",
        SEND_ERROR => "Failed sending data to the peer",
        RECV_ERROR => "Failure when receiving data from the peer",
        BAD_CONTENT_ENCODING => "Unrecognized or bad HTTP Content or Transfer-Encoding",
        _ => "Unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_known_and_unknown_codes() {
        assert_eq!(describe(COULDNT_CONNECT), "Couldn't connect to server");
        assert_eq!(describe(OK), "No error");
        assert_eq!(describe(999), "Unknown error");
    }
}
