mod tests_linking;
mod tests_redefinition;
