mod test_utils;

use storyloom_core::{InputType, MediaPayload};
use storyloom_jobs::{JobForm, character_context, csv_prompts};
use test_utils::character;

fn expect_err<T: std::fmt::Debug>(
    result: storyloom_error::StoryloomResult<T>,
) -> anyhow::Result<String> {
    match result {
        Ok(value) => anyhow::bail!("expected an error, got {:?}", value),
        Err(e) => Ok(e.user_message()),
    }
}

#[test]
fn character_context_lists_named_characters_with_images() {
    let characters = vec![
        character("Mira", "red scarf, freckles", 2),
        character("Tomas", "", 1),
        character("Nobody", "never uploaded", 0),
        character("", "nameless", 1),
    ];

    assert_eq!(character_context(&characters), "Mira: red scarf, freckles; Tomas");
}

#[test]
fn final_prompt_prefixes_character_and_scene_context() {
    let characters = vec![character("Mira", "red scarf", 1)];
    let form = JobForm {
        context_prompt: "  night market  ".to_string(),
        ..JobForm::default()
    };

    assert_eq!(
        form.build_final_prompt(&characters, "Mira buys a lantern"),
        "Reference characters: [Mira: red scarf]. Scene context: [night market]. \n\nMira buys a lantern"
    );
}

#[test]
fn creative_context_appends_the_reinterpretation_note() {
    let form = JobForm {
        context_prompt: "lighthouse".to_string(),
        creative_context: true,
        ..JobForm::default()
    };

    let prompt = form.build_final_prompt(&[], "Waves crash");
    assert!(prompt.starts_with("Scene context: [lighthouse] (AI should use this context image"));
    assert!(prompt.ends_with("suitable for the prompt).. \n\nWaves crash"));
}

#[test]
fn prompt_without_context_is_unchanged() {
    let characters = vec![character("Ghost", "", 0)];
    assert_eq!(
        JobForm::default().build_final_prompt(&characters, "Empty street"),
        "Empty street"
    );
}

#[test]
fn manual_job_rejects_blank_prompt() -> anyhow::Result<()> {
    let message = expect_err(JobForm::default().manual_job(&[], "   "))?;
    assert_eq!(message, "Prompt cannot be empty");
    Ok(())
}

#[test]
fn image_input_needs_a_selected_character_with_an_image() -> anyhow::Result<()> {
    let bare = character("Tomas", "", 0);
    let form = JobForm {
        input_type: InputType::Image,
        selected_character_id: Some(bare.id.clone()),
        ..JobForm::default()
    };

    let message = expect_err(form.manual_job(&[bare.clone()], "Tomas waves"))?;
    assert!(message.contains("Image-to-video requires"));

    let unselected = JobForm {
        input_type: InputType::Image,
        ..JobForm::default()
    };
    assert!(unselected.manual_job(&[bare], "Tomas waves").is_err());
    Ok(())
}

#[test]
fn manual_image_job_uses_first_image_of_selected_character() -> anyhow::Result<()> {
    let mira = character("Mira", "red scarf", 2);
    let tomas = character("Tomas", "", 1);
    let form = JobForm {
        input_type: InputType::Image,
        selected_character_id: Some(mira.id.clone()),
        ..JobForm::default()
    };

    let job = form.manual_job(&[mira, tomas], "They meet")?;

    assert_eq!(*job.seed_image(), Some(MediaPayload::new("image/png", vec![1])));
    assert_eq!(*job.reference_character_names(), vec!["Mira", "Tomas"]);
    assert!(job.prompt().ends_with("\n\nThey meet"));
    assert_eq!(*job.output_count(), 1);
    Ok(())
}

#[test]
fn text_job_carries_no_seed_even_with_selection() -> anyhow::Result<()> {
    let mira = character("Mira", "", 1);
    let form = JobForm {
        selected_character_id: Some(mira.id.clone()),
        ..JobForm::default()
    };

    let job = form.manual_job(&[mira], "Mira sleeps")?;
    assert_eq!(*job.seed_image(), None);
    Ok(())
}

#[test]
fn csv_prompts_reads_the_named_column() -> anyhow::Result<()> {
    let csv = "id,\"prompt\",notes\r\n1,\"A fox in snow\",x\r\n\r\n2,,y\n3, A crane takes off ,z\n4\n";

    let prompts = csv_prompts(csv, "prompt")?;
    assert_eq!(prompts, vec!["A fox in snow", "A crane takes off"]);
    Ok(())
}

#[test]
fn csv_needs_header_and_data() -> anyhow::Result<()> {
    let message = expect_err(csv_prompts("prompt\n\n", "prompt"))?;
    assert_eq!(message, "CSV file must have a header and at least one data row");
    Ok(())
}

#[test]
fn csv_reports_missing_column_with_found_headers() -> anyhow::Result<()> {
    let message = expect_err(csv_prompts("id, text ,\"notes\"\n1,a,b", "prompt"))?;
    assert_eq!(
        message,
        "Column 'prompt' not found in CSV header. Found: id, text, notes"
    );
    Ok(())
}

#[test]
fn csv_with_only_empty_cells_is_rejected() -> anyhow::Result<()> {
    let message = expect_err(csv_prompts("prompt,other\n,1\n\"\",2", "prompt"))?;
    assert_eq!(
        message,
        "No valid jobs with non-empty prompts found in the specified column"
    );
    assert!(csv_prompts("prompt\nx", "  ").is_err());
    Ok(())
}

#[test]
fn csv_jobs_share_form_settings() -> anyhow::Result<()> {
    let mira = character("Mira", "red scarf", 1);
    let form = JobForm {
        input_type: InputType::Image,
        selected_character_id: Some(mira.id.clone()),
        ..JobForm::default()
    };

    let jobs = form.csv_jobs(&[mira], "prompt\nfirst\nsecond\n", "prompt")?;

    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|j| j.seed_image().is_some()
        && *j.input_type() == InputType::Image
        && j.prompt().starts_with("Reference characters: [Mira: red scarf]")));
    assert!(jobs[0].prompt().ends_with("first"));
    assert!(jobs[1].prompt().ends_with("second"));
    assert_ne!(jobs[0].id(), jobs[1].id());
    Ok(())
}

#[test]
fn explicit_seed_image_wins_over_selection() -> anyhow::Result<()> {
    let mira = character("Mira", "", 1);
    let still = MediaPayload::new("image/jpeg", vec![9, 9, 9]);
    let form = JobForm {
        input_type: InputType::Image,
        selected_character_id: Some(mira.id.clone()),
        seed_image: Some(still.clone()),
        ..JobForm::default()
    };

    let job = form.manual_job(&[mira], "Mira turns around")?;
    assert_eq!(*job.seed_image(), Some(still));

    let no_characters = JobForm {
        input_type: InputType::Image,
        seed_image: Some(MediaPayload::new("image/png", vec![1])),
        ..JobForm::default()
    };
    assert!(no_characters.manual_job(&[], "Just the still").is_ok());
    Ok(())
}
