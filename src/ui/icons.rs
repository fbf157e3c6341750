pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const LINK: &str = "🔗";
    pub const BOOK: &str = "📚";
    pub const PARTIAL: &str = "🟠";
    pub const VOID: &str = "🔴";
}
