use kudos_types::{Category, TaskDefinition};

/// Built-in catalog a fresh deployment starts with. Admins are expected to
/// replace these through the CRUD surface.
pub fn default_definitions() -> Vec<TaskDefinition> {
    vec![
        // Core tasks
        TaskDefinition::new(Category::Core, "c1", "Finish homework unprompted", 10, "📝"),
        TaskDefinition::new(Category::Core, "c2", "Up and ready for school on time", 5, "🎯"),
        // Daily tasks
        TaskDefinition::new(Category::Daily, "d1", "Practice violin 30 minutes", 5, "🎻"),
        TaskDefinition::new(Category::Daily, "d2", "Morning reading", 3, "📖"),
        TaskDefinition::new(Category::Daily, "d3", "Outdoor exercise 1 hour", 5, "🏃"),
        // Bounties
        TaskDefinition::new(Category::Bounty, "b1", "Play with little brother", 10, "👶"),
        TaskDefinition::new(Category::Bounty, "b2", "Help dad fix things", 15, "🔧"),
        // Penalties
        TaskDefinition::new(Category::Penalty, "p1", "Yelling or talking back", 20, "😡"),
        TaskDefinition::new(Category::Penalty, "p2", "Dawdling past agreed times", 10, "🐢"),
        TaskDefinition::new(Category::Penalty, "p3", "Screen time without asking", 50, "📱"),
        // Store items
        TaskDefinition::new(Category::Store, "s1", "Phone time, 30 minutes", 50, "🎮"),
        TaskDefinition::new(Category::Store, "s2", "Movie night pick", 100, "🎬"),
        TaskDefinition::new(Category::Store, "s3", "Weekend commander", 300, "👑"),
        TaskDefinition::new(Category::Store, "s4", "Toolbox privileges", 100, "🛠️"),
    ]
}
