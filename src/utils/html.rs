/// Escapes user-supplied text for interpolation into an email body.
///
/// Every HTML-significant character is turned into an entity, so names and
/// titles render literally and can never inject markup.
pub fn escape(input: &str) -> String {
    ammonia::clean_text(input)
}

/// Cleans free-form rich text (offer terms) with ammonia's whitelist:
/// safe tags such as <b> and <p> survive, <script>, <iframe> and event
/// attributes are stripped.
pub fn sanitize(input: &str) -> String {
    ammonia::clean(input)
}
