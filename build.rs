fn main() {
    // ESP-IDF link arguments only matter for the device build; host test
    // builds run with `--no-default-features` and skip embuild entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
