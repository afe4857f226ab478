use bastion_core::config::HasherConfig;
use bastion_service::auth::PasswordHasher;

fn main() {
    let password = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "password".to_string());

    let hasher = match PasswordHasher::new(&HasherConfig::default()) {
        Ok(hasher) => hasher,
        Err(err) => {
            eprintln!("Failed to configure hasher: {err}");
            std::process::exit(1);
        }
    };

    match hasher.hash(&password) {
        Ok(hash) => {
            println!("{}", hash.as_str());
        }
        Err(err) => {
            eprintln!("Failed to hash password: {err}");
            std::process::exit(1);
        }
    }
}
