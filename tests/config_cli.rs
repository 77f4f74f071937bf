mod support;

use support::TestHome;

#[test]
fn id_prefixes_come_from_config() {
    let home = TestHome::new();
    home.write_config("[ids]\ntask_prefix = \"task\"\nreward_prefix = \"rw\"\n");

    let task_id = home.add_task("Read", 10);
    assert!(task_id.starts_with("task-"));

    let reward_id = home.add_reward("Coffee", 5);
    assert!(reward_id.starts_with("rw-"));
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let home = TestHome::new();
    home.write_config("[ids]\ntask_prefix = \"\"\n");

    let task_id = home.add_task("Read", 10);
    assert!(task_id.starts_with("t-"));
}

#[test]
fn configured_min_len_sets_suffix_length() {
    let home = TestHome::new();
    home.write_config("[ids]\nmin_len = 8\n");

    let task_id = home.add_task("Read", 10);
    let suffix = task_id.strip_prefix("t-").expect("prefixed id");
    assert_eq!(suffix.len(), 8);
}
