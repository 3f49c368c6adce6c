mod bounds;
mod film;
mod lights;
mod ray;
mod scene;
mod settings;

#[cfg(test)]
mod common;
