mod test_actions;
mod test_config;
