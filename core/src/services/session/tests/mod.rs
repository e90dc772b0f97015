//! Tests for the session token codec

#[cfg(test)]
mod codec_tests;
