/// Report-runner family a document was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    JUnit,
    TestNG,
    XUnit,
    NUnit,
    UnitTest,
    Unsupported,
}

impl FormatKind {
    /// Label the reporting service expects in `testType`.
    pub fn test_type(&self) -> &'static str {
        match self {
            FormatKind::JUnit | FormatKind::TestNG => "JUnit",
            FormatKind::XUnit => "XUnit",
            FormatKind::NUnit => "NUnit",
            FormatKind::UnitTest => "UnitTest",
            FormatKind::Unsupported => "Unsupported",
        }
    }

    /// Whether several reports of this kind can be folded from one directory.
    /// Only the `testsuites`/`testsuite` shape is supported.
    pub fn supports_directory(&self) -> bool {
        match self {
            FormatKind::JUnit => true,
            FormatKind::TestNG
            | FormatKind::XUnit
            | FormatKind::NUnit
            | FormatKind::UnitTest
            | FormatKind::Unsupported => false,
        }
    }
}
