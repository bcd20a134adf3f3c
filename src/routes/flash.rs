use axum_extra::extract::cookie::{Cookie, SignedCookieJar};

use super::form::SubmissionError;

const FLASH_COOKIE: &str = "flash";

/// Queues `error` to be shown by the next page that takes the flash.
pub fn set(jar: SignedCookieJar, error: SubmissionError) -> SignedCookieJar {
    let code: &'static str = error.into();
    jar.add(
        Cookie::build((FLASH_COOKIE, code))
            .path("/")
            .http_only(true),
    )
}

/// Removes the pending flash, if any. Unsigned or unknown values are dropped.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<SubmissionError>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let error = cookie.value().parse::<SubmissionError>().ok();
            let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
            (jar, error)
        }
        None => (jar, None),
    }
}
