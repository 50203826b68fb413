//! Notification message formatting

/// Build the notification body: the header line, then one URL per line.
///
/// Every line, including the last, is newline-terminated.
pub fn format_message(header: &str, urls: &[String]) -> String {
    let capacity = header.len() + 1 + urls.iter().map(|u| u.len() + 1).sum::<usize>();
    let mut message = String::with_capacity(capacity);

    message.push_str(header);
    message.push('\n');
    for url in urls {
        message.push_str(url);
        message.push('\n');
    }

    message
}
