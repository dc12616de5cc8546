/// Input for registering a user. `password` is plaintext here and is
/// hashed by the service before it reaches a repository.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub login: String,
    pub name: String,
    pub password: String,
    pub roles: Vec<String>,
}
