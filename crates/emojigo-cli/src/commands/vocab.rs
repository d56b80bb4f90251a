use emojigo_core::Vocabulary;

pub fn run(extended: bool) -> Result<(), Box<dyn std::error::Error>> {
    let vocab = if extended {
        Vocabulary::extended()
    } else {
        Vocabulary::standard()
    };
    for emotion in vocab.emotions() {
        println!("{emotion}");
    }
    Ok(())
}
