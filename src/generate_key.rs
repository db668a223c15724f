// generate_key.rs
// Utility to generate a new content encryption key

#[path = "services/encryption.rs"]
mod encryption;

use encryption::EncryptionService;

fn main() {
    println!("Generating new AES-256 content key...\n");

    let key = EncryptionService::generate_key();

    println!("✅ Key generated successfully!\n");
    println!("Add this to your .env file:");
    println!("─────────────────────────────────────────────────");
    println!("ENCRYPTION_KEY={}", key);
    println!("─────────────────────────────────────────────────");
    println!("\n⚠️  IMPORTANT:");
    println!("  • Keep this key secure and never commit it to version control");
    println!("  • Rotating it makes existing entries unreadable");
}
